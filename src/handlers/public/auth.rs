//! POST /auth/register and POST /auth/login - account creation and JWT issuance.

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;
use serde_json::json;

use crate::auth::{self, Claims};
use crate::database::manager::{is_unique_violation, DatabaseError, DatabaseManager};
use crate::database::users::UserRepository;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

pub async fn register(
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let username = payload.username.trim();
    if username.is_empty() {
        return Err(ApiError::field_error("username", "This field is required."));
    }
    if payload.password.len() < 8 {
        return Err(ApiError::field_error(
            "password",
            "Password must be at least 8 characters.",
        ));
    }

    let pool = DatabaseManager::pool().await?;
    let users = UserRepository::new(pool);

    let digest = auth::new_password_digest(&payload.password);
    let user = users.create(username, &digest).await.map_err(|err| {
        if let DatabaseError::Sqlx(ref sqlx_err) = err {
            if is_unique_violation(sqlx_err) {
                return ApiError::field_error("username", "This username is already in use.");
            }
        }
        err.into()
    })?;

    tracing::info!(user_id = %user.id, "registered user");
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "data": { "id": user.id, "username": user.username }
        })),
    ))
}

pub async fn login(Json(payload): Json<LoginRequest>) -> Result<impl IntoResponse, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let users = UserRepository::new(pool);

    let user = users
        .find_by_username(payload.username.trim())
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid username or password"))?;

    if !auth::verify_password(&payload.password, &user.password_digest) {
        return Err(ApiError::unauthorized("Invalid username or password"));
    }

    let claims = Claims::new(user.id, user.username.clone(), user.is_staff);
    let token = auth::generate_jwt(claims).map_err(|e| {
        tracing::error!("token generation failed: {}", e);
        ApiError::internal_server_error("Could not issue token")
    })?;

    Ok(Json(json!({
        "success": true,
        "data": {
            "token": token,
            "user": {
                "id": user.id,
                "username": user.username,
                "staff": user.is_staff
            }
        }
    })))
}
