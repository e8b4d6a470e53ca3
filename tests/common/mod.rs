//! Shared fixtures for the scenario tests: entity builders and an in-memory
//! sibling store standing in for the persistence layer.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use menu_maker_api::domain::entity::{Entity, EntityKind, Menu, MenuItem, MenuSection, Restaurant};
use menu_maker_api::domain::error::DomainError;
use menu_maker_api::domain::lifecycle::{ParentScope, SiblingLookup};
use menu_maker_api::domain::slug::slugify;

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

pub fn menu_entity(menu: Menu, restaurant: Restaurant) -> Entity {
    Entity::Menu {
        menu,
        parent: Box::new(Entity::Restaurant(restaurant)),
    }
}

pub fn item_entity(
    item: MenuItem,
    section: MenuSection,
    menu: Menu,
    restaurant: Restaurant,
) -> Entity {
    Entity::MenuItem {
        item,
        parent: Box::new(Entity::MenuSection {
            section,
            parent: Box::new(menu_entity(menu, restaurant)),
        }),
    }
}

type SlugKey = (EntityKind, Option<Uuid>, String);

/// Persistence stand-in tracking which slugs exist in which scope.
#[derive(Default)]
pub struct SlugStore {
    slugs: Mutex<HashMap<SlugKey, Vec<Uuid>>>,
}

impl SlugStore {
    pub fn insert(&self, kind: EntityKind, scope: ParentScope, slug: &str, id: Uuid) {
        let mut slugs = self.slugs.lock().unwrap();
        slugs
            .entry((kind, scope_key(&scope), slug.to_string()))
            .or_default()
            .push(id);
    }

    pub fn count(&self, kind: EntityKind, scope: ParentScope) -> usize {
        let slugs = self.slugs.lock().unwrap();
        slugs
            .iter()
            .filter(|((k, s, _), _)| *k == kind && *s == scope_key(&scope))
            .map(|(_, ids)| ids.len())
            .sum()
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
impl SiblingLookup for SlugStore {
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
