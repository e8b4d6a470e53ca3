//! /api/.../sections/:sid/items - slugs unique within the section.

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use super::{
    ensure_allowed, item_repo, lifecycle, load_item_chain, load_section_chain, ok, MenuItemPayload,
};
use crate::database::repository::map_write_error;
use crate::domain::entity::EntityKind;
use crate::domain::lifecycle::{ParentScope, SlugCandidate};
use crate::domain::permissions::{AuthorizationGate, Principal, Verb};
use crate::error::ApiError;

pub async fn list(
    Path((restaurant_id, menu_id, section_id)): Path<(Uuid, Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    let chain = load_section_chain(restaurant_id, menu_id, section_id).await?;
    let items = item_repo().await?.list_for_section(chain.section.id).await?;
    Ok(ok(items))
}

pub async fn get(
    Path((restaurant_id, menu_id, section_id, item_id)): Path<(Uuid, Uuid, Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    let chain = load_item_chain(restaurant_id, menu_id, section_id, item_id).await?;
    Ok(ok(chain.item))
}

pub async fn create(
    Path((restaurant_id, menu_id, section_id)): Path<(Uuid, Uuid, Uuid)>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<MenuItemPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let chain = load_section_chain(restaurant_id, menu_id, section_id).await?;

    let gate = AuthorizationGate::from_config();
    ensure_allowed(
        gate.authorize_in(&principal, Verb::Post, &chain.restaurant),
        &principal,
    )?;

    let slug = lifecycle()
        .await?
        .prepare_and_validate(&SlugCandidate {
            kind: EntityKind::MenuItem,
            scope: ParentScope::MenuSection(chain.section.id),
            entity_id: None,
            name: payload.name.clone(),
        })
        .await?;

    let item = item_repo()
        .await?
        .create(chain.section.id, &payload.name, &slug, &payload.description)
        .await
        .map_err(|e| map_write_error(e, EntityKind::MenuItem))?;

    tracing::info!(item_id = %item.id, slug = %item.slug, "created menu item");
    Ok((StatusCode::CREATED, ok(item)))
}

pub async fn update(
    Path((restaurant_id, menu_id, section_id, item_id)): Path<(Uuid, Uuid, Uuid, Uuid)>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<MenuItemPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let chain = load_item_chain(restaurant_id, menu_id, section_id, item_id).await?;

    let gate = AuthorizationGate::from_config();
    let decision = gate.authorize(&principal, Verb::Put, &chain.entity())?;
    ensure_allowed(decision, &principal)?;

    let slug = lifecycle()
        .await?
        .prepare_and_validate(&SlugCandidate {
            kind: EntityKind::MenuItem,
            scope: ParentScope::MenuSection(chain.section.id),
            entity_id: Some(chain.item.id),
            name: payload.name.clone(),
        })
        .await?;

    let updated = item_repo()
        .await?
        .update(chain.item.id, &payload.name, &slug, &payload.description)
        .await
        .map_err(|e| map_write_error(e, EntityKind::MenuItem))?;

    Ok(ok(updated))
}

pub async fn delete(
    Path((restaurant_id, menu_id, section_id, item_id)): Path<(Uuid, Uuid, Uuid, Uuid)>,
    Extension(principal): Extension<Principal>,
) -> Result<impl IntoResponse, ApiError> {
    let chain = load_item_chain(restaurant_id, menu_id, section_id, item_id).await?;

    let gate = AuthorizationGate::from_config();
    let decision = gate.authorize(&principal, Verb::Delete, &chain.entity())?;
    ensure_allowed(decision, &principal)?;

    item_repo().await?.delete(chain.item.id).await?;
    tracing::info!(item_id = %chain.item.id, "deleted menu item");
    Ok(StatusCode::NO_CONTENT)
}
