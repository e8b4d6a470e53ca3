//! /api/restaurants/:rid/menus - slugs unique within the restaurant.

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use super::{ensure_allowed, lifecycle, load_menu_chain, menu_repo, ok, restaurant_repo, NamePayload};
use crate::database::repository::map_write_error;
use crate::domain::entity::EntityKind;
use crate::domain::lifecycle::{ParentScope, SlugCandidate};
use crate::domain::permissions::{AuthorizationGate, Principal, Verb};
use crate::error::ApiError;

pub async fn list(Path(restaurant_id): Path<Uuid>) -> Result<impl IntoResponse, ApiError> {
    // 404 before an empty list for a bogus restaurant id
    restaurant_repo().await?.find(restaurant_id).await?;
    let menus = menu_repo().await?.list_for_restaurant(restaurant_id).await?;
    Ok(ok(menus))
}

pub async fn get(
    Path((restaurant_id, menu_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    let chain = load_menu_chain(restaurant_id, menu_id).await?;
    Ok(ok(chain.menu))
}

pub async fn create(
    Path(restaurant_id): Path<Uuid>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<NamePayload>,
) -> Result<impl IntoResponse, ApiError> {
    // The menu does not exist yet, so the gate runs against the intended parent.
    let restaurant = restaurant_repo().await?.find(restaurant_id).await?;
    let gate = AuthorizationGate::from_config();
    ensure_allowed(gate.authorize_in(&principal, Verb::Post, &restaurant), &principal)?;

    let slug = lifecycle()
        .await?
        .prepare_and_validate(&SlugCandidate {
            kind: EntityKind::Menu,
            scope: ParentScope::Restaurant(restaurant.id),
            entity_id: None,
            name: payload.name.clone(),
        })
        .await?;

    let menu = menu_repo()
        .await?
        .create(restaurant.id, &payload.name, &slug)
        .await
        .map_err(|e| map_write_error(e, EntityKind::Menu))?;

    tracing::info!(menu_id = %menu.id, slug = %menu.slug, "created menu");
    Ok((StatusCode::CREATED, ok(menu)))
}

pub async fn update(
    Path((restaurant_id, menu_id)): Path<(Uuid, Uuid)>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<NamePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let chain = load_menu_chain(restaurant_id, menu_id).await?;

    let gate = AuthorizationGate::from_config();
    let decision = gate.authorize(&principal, Verb::Put, &chain.entity())?;
    ensure_allowed(decision, &principal)?;

    let slug = lifecycle()
        .await?
        .prepare_and_validate(&SlugCandidate {
            kind: EntityKind::Menu,
            scope: ParentScope::Restaurant(chain.restaurant.id),
            entity_id: Some(chain.menu.id),
            name: payload.name.clone(),
        })
        .await?;

    let updated = menu_repo()
        .await?
        .update(chain.menu.id, &payload.name, &slug)
        .await
        .map_err(|e| map_write_error(e, EntityKind::Menu))?;

    Ok(ok(updated))
}

pub async fn delete(
    Path((restaurant_id, menu_id)): Path<(Uuid, Uuid)>,
    Extension(principal): Extension<Principal>,
) -> Result<impl IntoResponse, ApiError> {
    let chain = load_menu_chain(restaurant_id, menu_id).await?;

    let gate = AuthorizationGate::from_config();
    let decision = gate.authorize(&principal, Verb::Delete, &chain.entity())?;
    ensure_allowed(decision, &principal)?;

    menu_repo().await?.delete(chain.menu.id).await?;
    tracing::info!(menu_id = %chain.menu.id, "deleted menu");
    Ok(StatusCode::NO_CONTENT)
}
