//! Typed repositories over the entity tables.
//!
//! Each write path pairs with a unique index on (parent, slug) so the
//! validate-then-write race cannot admit duplicate siblings; `map_write_error`
//! folds that violation back into the duplicate-slug validation error.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::{is_unique_violation, DatabaseError};
use crate::domain::entity::{EntityKind, Menu, MenuItem, MenuSection, Restaurant};
use crate::domain::error::DomainError;
use crate::domain::lifecycle::{ParentScope, SiblingLookup};
use crate::error::ApiError;

/// Translate a failed insert/update into the client-facing error: a unique
/// violation on the slug index is the concurrent twin of `duplicate-slug`.
pub fn map_write_error(err: DatabaseError, kind: EntityKind) -> ApiError {
    if let DatabaseError::Sqlx(ref sqlx_err) = err {
        if is_unique_violation(sqlx_err) {
            return DomainError::duplicate_slug(kind).into();
        }
    }
    err.into()
}

#[derive(Clone)]
pub struct RestaurantRepository {
    pool: PgPool,
}

impl RestaurantRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Restaurant>, DatabaseError> {
        let rows = sqlx::query_as::<_, Restaurant>(
            "SELECT id, name, slug, admin_user_ids FROM restaurants ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn find(&self, id: Uuid) -> Result<Restaurant, DatabaseError> {
        sqlx::query_as::<_, Restaurant>(
            "SELECT id, name, slug, admin_user_ids FROM restaurants WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound("Restaurant not found".to_string()))
    }

    /// Number of restaurants this user administrates, for the per-user limit.
    pub async fn count_admined_by(&self, user_id: Uuid) -> Result<i64, DatabaseError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM restaurants WHERE $1 = ANY(admin_user_ids)")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    /// Insert with the creator as first administrator.
    pub async fn create(
        &self,
        name: &str,
        slug: &str,
        creator: Uuid,
    ) -> Result<Restaurant, DatabaseError> {
        let row = sqlx::query_as::<_, Restaurant>(
            "INSERT INTO restaurants (id, name, slug, admin_user_ids) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, name, slug, admin_user_ids",
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(slug)
        .bind(vec![creator])
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn update(
        &self,
        id: Uuid,
        name: &str,
        slug: &str,
    ) -> Result<Restaurant, DatabaseError> {
        sqlx::query_as::<_, Restaurant>(
            "UPDATE restaurants SET name = $2, slug = $3 WHERE id = $1 \
             RETURNING id, name, slug, admin_user_ids",
        )
        .bind(id)
        .bind(name)
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound("Restaurant not found".to_string()))
    }

    /// Descendant menus, sections and items go with it (ON DELETE CASCADE).
    pub async fn delete(&self, id: Uuid) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM restaurants WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound("Restaurant not found".to_string()));
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct MenuRepository {
    pool: PgPool,
}

impl MenuRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_for_restaurant(&self, restaurant_id: Uuid) -> Result<Vec<Menu>, DatabaseError> {
        let rows = sqlx::query_as::<_, Menu>(
            "SELECT id, restaurant_id, name, slug FROM menus \
             WHERE restaurant_id = $1 ORDER BY name",
        )
        .bind(restaurant_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn find(&self, id: Uuid) -> Result<Menu, DatabaseError> {
        sqlx::query_as::<_, Menu>(
            "SELECT id, restaurant_id, name, slug FROM menus WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound("Menu not found".to_string()))
    }

    pub async fn create(
        &self,
        restaurant_id: Uuid,
        name: &str,
        slug: &str,
    ) -> Result<Menu, DatabaseError> {
        let row = sqlx::query_as::<_, Menu>(
            "INSERT INTO menus (id, restaurant_id, name, slug) VALUES ($1, $2, $3, $4) \
             RETURNING id, restaurant_id, name, slug",
        )
        .bind(Uuid::new_v4())
        .bind(restaurant_id)
        .bind(name)
        .bind(slug)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn update(&self, id: Uuid, name: &str, slug: &str) -> Result<Menu, DatabaseError> {
        sqlx::query_as::<_, Menu>(
            "UPDATE menus SET name = $2, slug = $3 WHERE id = $1 \
             RETURNING id, restaurant_id, name, slug",
        )
        .bind(id)
        .bind(name)
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound("Menu not found".to_string()))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM menus WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound("Menu not found".to_string()));
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct MenuSectionRepository {
    pool: PgPool,
}

impl MenuSectionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_for_menu(&self, menu_id: Uuid) -> Result<Vec<MenuSection>, DatabaseError> {
        let rows = sqlx::query_as::<_, MenuSection>(
            "SELECT id, menu_id, name, slug FROM menu_sections WHERE menu_id = $1 ORDER BY name",
        )
        .bind(menu_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn find(&self, id: Uuid) -> Result<MenuSection, DatabaseError> {
        sqlx::query_as::<_, MenuSection>(
            "SELECT id, menu_id, name, slug FROM menu_sections WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound("Menu section not found".to_string()))
    }

    pub async fn create(
        &self,
        menu_id: Uuid,
        name: &str,
        slug: &str,
    ) -> Result<MenuSection, DatabaseError> {
        let row = sqlx::query_as::<_, MenuSection>(
            "INSERT INTO menu_sections (id, menu_id, name, slug) VALUES ($1, $2, $3, $4) \
             RETURNING id, menu_id, name, slug",
        )
        .bind(Uuid::new_v4())
        .bind(menu_id)
        .bind(name)
        .bind(slug)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn update(
        &self,
        id: Uuid,
        name: &str,
        slug: &str,
    ) -> Result<MenuSection, DatabaseError> {
        sqlx::query_as::<_, MenuSection>(
            "UPDATE menu_sections SET name = $2, slug = $3 WHERE id = $1 \
             RETURNING id, menu_id, name, slug",
        )
        .bind(id)
        .bind(name)
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound("Menu section not found".to_string()))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM menu_sections WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound("Menu section not found".to_string()));
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct MenuItemRepository {
    pool: PgPool,
}

impl MenuItemRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_for_section(
        &self,
        menu_section_id: Uuid,
    ) -> Result<Vec<MenuItem>, DatabaseError> {
        let rows = sqlx::query_as::<_, MenuItem>(
            "SELECT id, menu_section_id, name, slug, description FROM menu_items \
             WHERE menu_section_id = $1 ORDER BY name",
        )
        .bind(menu_section_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn find(&self, id: Uuid) -> Result<MenuItem, DatabaseError> {
        sqlx::query_as::<_, MenuItem>(
            "SELECT id, menu_section_id, name, slug, description FROM menu_items WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound("Menu item not found".to_string()))
    }

    pub async fn create(
        &self,
        menu_section_id: Uuid,
        name: &str,
        slug: &str,
        description: &str,
    ) -> Result<MenuItem, DatabaseError> {
        let row = sqlx::query_as::<_, MenuItem>(
            "INSERT INTO menu_items (id, menu_section_id, name, slug, description) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, menu_section_id, name, slug, description",
        )
        .bind(Uuid::new_v4())
        .bind(menu_section_id)
        .bind(name)
        .bind(slug)
        .bind(description)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn update(
        &self,
        id: Uuid,
        name: &str,
        slug: &str,
        description: &str,
    ) -> Result<MenuItem, DatabaseError> {
        sqlx::query_as::<_, MenuItem>(
            "UPDATE menu_items SET name = $2, slug = $3, description = $4 WHERE id = $1 \
             RETURNING id, menu_section_id, name, slug, description",
        )
        .bind(id)
        .bind(name)
        .bind(slug)
        .bind(description)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound("Menu item not found".to_string()))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM menu_items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound("Menu item not found".to_string()));
        }
        Ok(())
    }
}

/// `SiblingLookup` over the live tables, one query per validation.
#[derive(Clone)]
pub struct PgSiblingLookup {
    pool: PgPool,
}

impl PgSiblingLookup {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SiblingLookup for PgSiblingLookup {
    async fn find_siblings(
        &self,
        kind: EntityKind,
        scope: &ParentScope,
        slug: &str,
    ) -> Result<Vec<Uuid>, DomainError> {
        scope.check_kind(kind)?;

        let query = match (kind, scope) {
            (EntityKind::Restaurant, ParentScope::Global) => {
                sqlx::query_scalar::<_, Uuid>("SELECT id FROM restaurants WHERE slug = $1")
                    .bind(slug)
            }
            (EntityKind::Menu, ParentScope::Restaurant(rid)) => sqlx::query_scalar::<_, Uuid>(
                "SELECT id FROM menus WHERE restaurant_id = $2 AND slug = $1",
            )
            .bind(slug)
            .bind(*rid),
            (EntityKind::MenuSection, ParentScope::Menu(mid)) => sqlx::query_scalar::<_, Uuid>(
                "SELECT id FROM menu_sections WHERE menu_id = $2 AND slug = $1",
            )
            .bind(slug)
            .bind(*mid),
            (EntityKind::MenuItem, ParentScope::MenuSection(sid)) => {
                sqlx::query_scalar::<_, Uuid>(
                    "SELECT id FROM menu_items WHERE menu_section_id = $2 AND slug = $1",
                )
                .bind(slug)
                .bind(*sid)
            }
            // check_kind above rejects every other pairing
            _ => unreachable!(),
        };

        query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::Storage(e.to_string()))
    }
}
