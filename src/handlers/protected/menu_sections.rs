//! /api/restaurants/:rid/menus/:mid/sections - slugs unique within the menu.

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use super::{
    ensure_allowed, lifecycle, load_menu_chain, load_section_chain, ok, section_repo, NamePayload,
};
use crate::database::repository::map_write_error;
use crate::domain::entity::EntityKind;
use crate::domain::lifecycle::{ParentScope, SlugCandidate};
use crate::domain::permissions::{AuthorizationGate, Principal, Verb};
use crate::error::ApiError;

pub async fn list(
    Path((restaurant_id, menu_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    let chain = load_menu_chain(restaurant_id, menu_id).await?;
    let sections = section_repo().await?.list_for_menu(chain.menu.id).await?;
    Ok(ok(sections))
}

pub async fn get(
    Path((restaurant_id, menu_id, section_id)): Path<(Uuid, Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    let chain = load_section_chain(restaurant_id, menu_id, section_id).await?;
    Ok(ok(chain.section))
}

pub async fn create(
    Path((restaurant_id, menu_id)): Path<(Uuid, Uuid)>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<NamePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let chain = load_menu_chain(restaurant_id, menu_id).await?;

    let gate = AuthorizationGate::from_config();
    ensure_allowed(
        gate.authorize_in(&principal, Verb::Post, &chain.restaurant),
        &principal,
    )?;

    let slug = lifecycle()
        .await?
        .prepare_and_validate(&SlugCandidate {
            kind: EntityKind::MenuSection,
            scope: ParentScope::Menu(chain.menu.id),
            entity_id: None,
            name: payload.name.clone(),
        })
        .await?;

    let section = section_repo()
        .await?
        .create(chain.menu.id, &payload.name, &slug)
        .await
        .map_err(|e| map_write_error(e, EntityKind::MenuSection))?;

    tracing::info!(section_id = %section.id, slug = %section.slug, "created menu section");
    Ok((StatusCode::CREATED, ok(section)))
}

pub async fn update(
    Path((restaurant_id, menu_id, section_id)): Path<(Uuid, Uuid, Uuid)>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<NamePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let chain = load_section_chain(restaurant_id, menu_id, section_id).await?;

    let gate = AuthorizationGate::from_config();
    let decision = gate.authorize(&principal, Verb::Put, &chain.entity())?;
    ensure_allowed(decision, &principal)?;

    let slug = lifecycle()
        .await?
        .prepare_and_validate(&SlugCandidate {
            kind: EntityKind::MenuSection,
            scope: ParentScope::Menu(chain.menu.id),
            entity_id: Some(chain.section.id),
            name: payload.name.clone(),
        })
        .await?;

    let updated = section_repo()
        .await?
        .update(chain.section.id, &payload.name, &slug)
        .await
        .map_err(|e| map_write_error(e, EntityKind::MenuSection))?;

    Ok(ok(updated))
}

pub async fn delete(
    Path((restaurant_id, menu_id, section_id)): Path<(Uuid, Uuid, Uuid)>,
    Extension(principal): Extension<Principal>,
) -> Result<impl IntoResponse, ApiError> {
    let chain = load_section_chain(restaurant_id, menu_id, section_id).await?;

    let gate = AuthorizationGate::from_config();
    let decision = gate.authorize(&principal, Verb::Delete, &chain.entity())?;
    ensure_allowed(decision, &principal)?;

    section_repo().await?.delete(chain.section.id).await?;
    tracing::info!(section_id = %chain.section.id, "deleted menu section");
    Ok(StatusCode::NO_CONTENT)
}
