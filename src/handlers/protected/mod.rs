//! Hierarchy CRUD. Every mutation is gated on administrator membership of the
//! owning restaurant, then run through the slug lifecycle before the write.

pub mod menu_items;
pub mod menu_sections;
pub mod menus;
pub mod restaurants;

use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::manager::DatabaseManager;
use crate::database::repository::{
    MenuItemRepository, MenuRepository, MenuSectionRepository, PgSiblingLookup,
    RestaurantRepository,
};
use crate::domain::entity::{Entity, Menu, MenuItem, MenuSection, Restaurant};
use crate::domain::lifecycle::LifecycleService;
use crate::domain::permissions::{Decision, Principal};
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct NamePayload {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct MenuItemPayload {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

pub(crate) fn ok(data: impl serde::Serialize) -> Json<Value> {
    Json(json!({ "success": true, "data": data }))
}

/// Map a deny to the transport error: missing credentials for anonymous
/// callers, missing permission for authenticated ones.
pub(crate) fn ensure_allowed(decision: Decision, principal: &Principal) -> Result<(), ApiError> {
    if decision.is_allowed() {
        return Ok(());
    }
    if principal.is_authenticated() {
        Err(ApiError::forbidden(
            "You do not have permission to perform this action.",
        ))
    } else {
        Err(ApiError::unauthorized(
            "Authentication credentials were not provided.",
        ))
    }
}

pub(crate) async fn lifecycle() -> Result<LifecycleService<PgSiblingLookup>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    Ok(LifecycleService::new(PgSiblingLookup::new(pool)))
}

/// A menu with its loaded owner.
pub(crate) struct MenuChain {
    pub restaurant: Restaurant,
    pub menu: Menu,
}

impl MenuChain {
    pub fn entity(&self) -> Entity {
        Entity::Menu {
            menu: self.menu.clone(),
            parent: Box::new(Entity::Restaurant(self.restaurant.clone())),
        }
    }
}

pub(crate) struct SectionChain {
    pub restaurant: Restaurant,
    pub menu: Menu,
    pub section: MenuSection,
}

impl SectionChain {
    pub fn entity(&self) -> Entity {
        Entity::MenuSection {
            section: self.section.clone(),
            parent: Box::new(
                MenuChain {
                    restaurant: self.restaurant.clone(),
                    menu: self.menu.clone(),
                }
                .entity(),
            ),
        }
    }
}

pub(crate) struct ItemChain {
    pub restaurant: Restaurant,
    pub menu: Menu,
    pub section: MenuSection,
    pub item: MenuItem,
}

impl ItemChain {
    pub fn entity(&self) -> Entity {
        Entity::MenuItem {
            item: self.item.clone(),
            parent: Box::new(
                SectionChain {
                    restaurant: self.restaurant.clone(),
                    menu: self.menu.clone(),
                    section: self.section.clone(),
                }
                .entity(),
            ),
        }
    }
}

fn not_found(what: &str) -> ApiError {
    ApiError::not_found(format!("{} not found", what))
}

/// Load a menu and its owner, checking the path nesting is real.
pub(crate) async fn load_menu_chain(
    restaurant_id: Uuid,
    menu_id: Uuid,
) -> Result<MenuChain, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let restaurant = RestaurantRepository::new(pool.clone()).find(restaurant_id).await?;
    let menu = MenuRepository::new(pool).find(menu_id).await?;
    if menu.restaurant_id != restaurant.id {
        return Err(not_found("Menu"));
    }
    Ok(MenuChain { restaurant, menu })
}

pub(crate) async fn load_section_chain(
    restaurant_id: Uuid,
    menu_id: Uuid,
    section_id: Uuid,
) -> Result<SectionChain, ApiError> {
    let chain = load_menu_chain(restaurant_id, menu_id).await?;
    let pool = DatabaseManager::pool().await?;
    let section = MenuSectionRepository::new(pool).find(section_id).await?;
    if section.menu_id != chain.menu.id {
        return Err(not_found("Menu section"));
    }
    Ok(SectionChain {
        restaurant: chain.restaurant,
        menu: chain.menu,
        section,
    })
}

pub(crate) async fn load_item_chain(
    restaurant_id: Uuid,
    menu_id: Uuid,
    section_id: Uuid,
    item_id: Uuid,
) -> Result<ItemChain, ApiError> {
    let chain = load_section_chain(restaurant_id, menu_id, section_id).await?;
    let pool = DatabaseManager::pool().await?;
    let item = MenuItemRepository::new(pool).find(item_id).await?;
    if item.menu_section_id != chain.section.id {
        return Err(not_found("Menu item"));
    }
    Ok(ItemChain {
        restaurant: chain.restaurant,
        menu: chain.menu,
        section: chain.section,
        item,
    })
}

pub(crate) async fn restaurant_repo() -> Result<RestaurantRepository, ApiError> {
    Ok(RestaurantRepository::new(DatabaseManager::pool().await?))
}

pub(crate) async fn menu_repo() -> Result<MenuRepository, ApiError> {
    Ok(MenuRepository::new(DatabaseManager::pool().await?))
}

pub(crate) async fn section_repo() -> Result<MenuSectionRepository, ApiError> {
    Ok(MenuSectionRepository::new(DatabaseManager::pool().await?))
}

pub(crate) async fn item_repo() -> Result<MenuItemRepository, ApiError> {
    Ok(MenuItemRepository::new(DatabaseManager::pool().await?))
}