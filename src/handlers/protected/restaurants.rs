//! /api/restaurants - top of the hierarchy. Slugs are globally unique and the
//! creator becomes the first administrator.

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use super::{ensure_allowed, lifecycle, ok, restaurant_repo, NamePayload};
use crate::config;
use crate::database::repository::map_write_error;
use crate::domain::entity::{Entity, EntityKind};
use crate::domain::lifecycle::{ParentScope, SlugCandidate};
use crate::domain::permissions::{check_restaurant_quota, AuthorizationGate, Principal, Verb};
use crate::error::ApiError;

pub async fn list() -> Result<impl IntoResponse, ApiError> {
    let restaurants = restaurant_repo().await?.list().await?;
    Ok(ok(restaurants))
}

pub async fn get(Path(restaurant_id): Path<Uuid>) -> Result<impl IntoResponse, ApiError> {
    let restaurant = restaurant_repo().await?.find(restaurant_id).await?;
    Ok(ok(restaurant))
}

pub async fn create(
    Extension(principal): Extension<Principal>,
    Json(payload): Json<NamePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = principal.id().ok_or_else(|| {
        ApiError::unauthorized("Authentication credentials were not provided.")
    })?;

    let repo = restaurant_repo().await?;

    let administered = repo.count_admined_by(user_id).await?;
    let limit = config::config().validation.max_restaurants_per_user;
    check_restaurant_quota(&principal, administered, limit)?;

    let slug = lifecycle()
        .await?
        .prepare_and_validate(&SlugCandidate {
            kind: EntityKind::Restaurant,
            scope: ParentScope::Global,
            entity_id: None,
            name: payload.name.clone(),
        })
        .await?;

    let restaurant = repo
        .create(&payload.name, &slug, user_id)
        .await
        .map_err(|e| map_write_error(e, EntityKind::Restaurant))?;

    tracing::info!(restaurant_id = %restaurant.id, slug = %restaurant.slug, "created restaurant");
    Ok((StatusCode::CREATED, ok(restaurant)))
}

pub async fn update(
    Path(restaurant_id): Path<Uuid>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<NamePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = restaurant_repo().await?;
    let restaurant = repo.find(restaurant_id).await?;

    let gate = AuthorizationGate::from_config();
    let decision = gate.authorize(&principal, Verb::Put, &Entity::Restaurant(restaurant.clone()))?;
    ensure_allowed(decision, &principal)?;

    let slug = lifecycle()
        .await?
        .prepare_and_validate(&SlugCandidate {
            kind: EntityKind::Restaurant,
            scope: ParentScope::Global,
            entity_id: Some(restaurant.id),
            name: payload.name.clone(),
        })
        .await?;

    let updated = repo
        .update(restaurant.id, &payload.name, &slug)
        .await
        .map_err(|e| map_write_error(e, EntityKind::Restaurant))?;

    Ok(ok(updated))
}

pub async fn delete(
    Path(restaurant_id): Path<Uuid>,
    Extension(principal): Extension<Principal>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = restaurant_repo().await?;
    let restaurant = repo.find(restaurant_id).await?;

    let gate = AuthorizationGate::from_config();
    let decision =
        gate.authorize(&principal, Verb::Delete, &Entity::Restaurant(restaurant.clone()))?;
    ensure_allowed(decision, &principal)?;

    repo.delete(restaurant.id).await?;
    tracing::info!(restaurant_id = %restaurant.id, "deleted restaurant");
    Ok(StatusCode::NO_CONTENT)
}
