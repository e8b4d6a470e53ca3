//! Unit-test fixtures: entity factories and an in-memory sibling store.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entity::EntityKind;
use crate::domain::error::DomainError;
use crate::domain::lifecycle::{ParentScope, SiblingLookup};
use crate::domain::slug::slugify;

/// Builders for well-formed entities with derived slugs.
pub mod factories {
    use super::*;
    use crate::domain::entity::{Menu, MenuItem, MenuSection, Restaurant};

    pub fn restaurant(name: &str, admin_user_ids: &[Uuid]) -> Restaurant {
        Restaurant {
            id: Uuid::new_v4(),
            name: name.to_string(),
            slug: slugify(name),
            admin_user_ids: admin_user_ids.to_vec(),
        }
    }

    pub fn menu(restaurant: &Restaurant, name: &str) -> Menu {
        Menu {
            id: Uuid::new_v4(),
            restaurant_id: restaurant.id,
            name: name.to_string(),
            slug: slugify(name),
        }
    }

    pub fn menu_section(menu: &Menu, name: &str) -> MenuSection {
        MenuSection {
            id: Uuid::new_v4(),
            menu_id: menu.id,
            name: name.to_string(),
            slug: slugify(name),
        }
    }

    pub fn menu_item(section: &MenuSection, name: &str) -> MenuItem {
        MenuItem {
            id: Uuid::new_v4(),
            menu_section_id: section.id,
            name: name.to_string(),
            slug: slugify(name),
            description: "Test Menu Item Description".to_string(),
        }
    }
}

type SlugKey = (EntityKind, Option<Uuid>, String);

/// `SiblingLookup` backed by a map, for exercising the lifecycle without a
/// database.
#[derive(Default)]
pub struct InMemorySiblings {
    slugs: Mutex<HashMap<SlugKey, Vec<Uuid>>>,
}

impl InMemorySiblings {
    pub fn insert(&self, kind: EntityKind, scope: ParentScope, slug: &str, id: Uuid) {
        let mut slugs = self.slugs.lock().unwrap();
        slugs
            .entry((kind, scope_key(&scope), slug.to_string()))
            .or_default()
            .push(id);
    }
}

fn scope_key(scope: &ParentScope) -> Option<Uuid> {
    match scope {
        ParentScope::Global => None,
        ParentScope::Restaurant(id) | ParentScope::Menu(id) | ParentScope::MenuSection(id) => {
            Some(*id)
        }
    }
}

#[async_trait]
impl SiblingLookup for InMemorySiblings {
    async fn find_siblings(
        &self,
        kind: EntityKind,
        scope: &ParentScope,
        slug: &str,
    ) -> Result<Vec<Uuid>, DomainError> {
        let slugs = self.slugs.lock().unwrap();
        Ok(slugs
            .get(&(kind, scope_key(scope), slug.to_string()))
            .cloned()
            .unwrap_or_default())
    }
}
