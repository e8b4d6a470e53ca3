use axum::{middleware::from_fn, routing::get, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use menu_maker_api::database::manager::DatabaseManager;
use menu_maker_api::handlers::public::auth;
use menu_maker_api::handlers::protected::{menu_items, menu_sections, menus, restaurants};
use menu_maker_api::middleware::principal_middleware;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "menu_maker_api=debug,tower_http=info".into()),
        )
        .init();

    let config = menu_maker_api::config::config();
    tracing::info!("Starting Menu Maker API in {:?} mode", config.environment);

    let app = app();

    let port = std::env::var("MENU_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("Menu Maker API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app() -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(auth_routes())
        .merge(api_routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn auth_routes() -> Router {
    use axum::routing::post;

    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
}

fn api_routes() -> Router {
    Router::new()
        .route(
            "/api/restaurants",
            get(restaurants::list).post(restaurants::create),
        )
        .route(
            "/api/restaurants/:restaurant_id",
            get(restaurants::get)
                .put(restaurants::update)
                .delete(restaurants::delete),
        )
        .route(
            "/api/restaurants/:restaurant_id/menus",
            get(menus::list).post(menus::create),
        )
        .route(
            "/api/restaurants/:restaurant_id/menus/:menu_id",
            get(menus::get).put(menus::update).delete(menus::delete),
        )
        .route(
            "/api/restaurants/:restaurant_id/menus/:menu_id/sections",
            get(menu_sections::list).post(menu_sections::create),
        )
        .route(
            "/api/restaurants/:restaurant_id/menus/:menu_id/sections/:section_id",
            get(menu_sections::get)
                .put(menu_sections::update)
                .delete(menu_sections::delete),
        )
        .route(
            "/api/restaurants/:restaurant_id/menus/:menu_id/sections/:section_id/items",
            get(menu_items::list).post(menu_items::create),
        )
        .route(
            "/api/restaurants/:restaurant_id/menus/:menu_id/sections/:section_id/items/:item_id",
            get(menu_items::get)
                .put(menu_items::update)
                .delete(menu_items::delete),
        )
        // Every /api route sees a resolved principal, anonymous included.
        .layer(from_fn(principal_middleware))
}

async fn root() -> axum::Json<Value> {
    axum::Json(json!({
        "name": "menu-maker-api",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn health() -> axum::Json<Value> {
    let database = match DatabaseManager::health_check().await {
        Ok(()) => "ok",
        Err(e) => {
            tracing::warn!("health check failed: {}", e);
            "unavailable"
        }
    };
    axum::Json(json!({ "status": "ok", "database": database }))
}
