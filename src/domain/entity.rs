use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::error::KindError;

/// The four entity kinds, ordered root to leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Restaurant,
    Menu,
    MenuSection,
    MenuItem,
}

/// Root of the ownership tree. Slug is globally unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Restaurant {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    /// Principals allowed to mutate anything beneath this restaurant. The creator
    /// is inserted here by the creation flow; the core tolerates an empty set.
    pub admin_user_ids: Vec<Uuid>,
}

impl Restaurant {
    pub fn is_admin(&self, user_id: Uuid) -> bool {
        self.admin_user_ids.contains(&user_id)
    }
}

/// Slug unique within its restaurant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Menu {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub name: String,
    pub slug: String,
}

/// Slug unique within its menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MenuSection {
    pub id: Uuid,
    pub menu_id: Uuid,
    pub name: String,
    pub slug: String,
}

/// Slug unique within its section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MenuItem {
    pub id: Uuid,
    pub menu_section_id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
}

/// An entity together with its loaded ownership chain. Children hold their parent
/// boxed, so ownership resolution is a pure in-memory walk; the caller is
/// responsible for loading the chain before constructing one of these.
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Restaurant(Restaurant),
    Menu { menu: Menu, parent: Box<Entity> },
    MenuSection { section: MenuSection, parent: Box<Entity> },
    MenuItem { item: MenuItem, parent: Box<Entity> },
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Restaurant(_) => EntityKind::Restaurant,
            Entity::Menu { .. } => EntityKind::Menu,
            Entity::MenuSection { .. } => EntityKind::MenuSection,
            Entity::MenuItem { .. } => EntityKind::MenuItem,
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            Entity::Restaurant(r) => r.id,
            Entity::Menu { menu, .. } => menu.id,
            Entity::MenuSection { section, .. } => section.id,
            Entity::MenuItem { item, .. } => item.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Entity::Restaurant(r) => &r.name,
            Entity::Menu { menu, .. } => &menu.name,
            Entity::MenuSection { section, .. } => &section.name,
            Entity::MenuItem { item, .. } => &item.name,
        }
    }

    /// Walk the ownership chain up to the governing restaurant.
    ///
    /// A restaurant owns itself. For every other kind the parent link must carry
    /// the next kind up; any other shape is a malformed chain and fails with a
    /// kind error rather than a deny, since it means the caller assembled the
    /// chain wrong.
    pub fn resolve_owner(&self) -> Result<&Restaurant, KindError> {
        match self {
            Entity::Restaurant(r) => Ok(r),
            Entity::Menu { parent, .. } => match parent.as_ref() {
                Entity::Restaurant(r) => Ok(r),
                other => Err(KindError::MalformedChain {
                    child: EntityKind::Menu,
                    expected: EntityKind::Restaurant,
                    found: other.kind(),
                }),
            },
            Entity::MenuSection { parent, .. } => match parent.as_ref() {
                Entity::Menu { .. } => parent.resolve_owner(),
                other => Err(KindError::MalformedChain {
                    child: EntityKind::MenuSection,
                    expected: EntityKind::Menu,
                    found: other.kind(),
                }),
            },
            Entity::MenuItem { parent, .. } => match parent.as_ref() {
                Entity::MenuSection { .. } => parent.resolve_owner(),
                other => Err(KindError::MalformedChain {
                    child: EntityKind::MenuItem,
                    expected: EntityKind::MenuSection,
                    found: other.kind(),
                }),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::factories;

    #[test]
    fn restaurant_resolves_to_itself() {
        let restaurant = factories::restaurant("Test Restaurant", &[]);
        let entity = Entity::Restaurant(restaurant.clone());
        assert_eq!(entity.resolve_owner().unwrap().id, restaurant.id);
    }

    #[test]
    fn menu_item_resolves_through_full_chain() {
        let restaurant = factories::restaurant("Test Restaurant", &[]);
        let menu = factories::menu(&restaurant, "Test Menu");
        let section = factories::menu_section(&menu, "Test Menu Section");
        let item = factories::menu_item(&section, "Test Menu Item");

        let entity = Entity::MenuItem {
            item,
            parent: Box::new(Entity::MenuSection {
                section,
                parent: Box::new(Entity::Menu {
                    menu,
                    parent: Box::new(Entity::Restaurant(restaurant.clone())),
                }),
            }),
        };

        assert_eq!(entity.resolve_owner().unwrap().id, restaurant.id);
    }

    #[test]
    fn malformed_chain_is_a_kind_error() {
        let restaurant = factories::restaurant("Test Restaurant", &[]);
        let menu = factories::menu(&restaurant, "Test Menu");
        let section = factories::menu_section(&menu, "Test Menu Section");

        // Section whose parent link skips the menu entirely.
        let entity = Entity::MenuSection {
            section,
            parent: Box::new(Entity::Restaurant(restaurant)),
        };

        let err = entity.resolve_owner().unwrap_err();
        assert_eq!(
            err,
            KindError::MalformedChain {
                child: EntityKind::MenuSection,
                expected: EntityKind::Menu,
                found: EntityKind::Restaurant,
            }
        );
    }

}
