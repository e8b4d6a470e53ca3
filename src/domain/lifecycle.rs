//! Slug (re)computation and uniqueness validation on every create/update.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entity::EntityKind;
use crate::domain::error::{DomainError, KindError};
use crate::domain::slug::{is_reserved, slugify};

/// The scope a slug must be unique within: global for restaurants, the immediate
/// parent for everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentScope {
    Global,
    Restaurant(Uuid),
    Menu(Uuid),
    MenuSection(Uuid),
}

impl ParentScope {
    fn describe(&self) -> &'static str {
        match self {
            ParentScope::Global => "global",
            ParentScope::Restaurant(_) => "restaurant",
            ParentScope::Menu(_) => "menu",
            ParentScope::MenuSection(_) => "menu_section",
        }
    }

    /// Each kind pairs with exactly one scope shape; anything else is a caller bug.
    pub fn check_kind(&self, kind: EntityKind) -> Result<(), KindError> {
        let ok = matches!(
            (kind, self),
            (EntityKind::Restaurant, ParentScope::Global)
                | (EntityKind::Menu, ParentScope::Restaurant(_))
                | (EntityKind::MenuSection, ParentScope::Menu(_))
                | (EntityKind::MenuItem, ParentScope::MenuSection(_))
        );
        if ok {
            Ok(())
        } else {
            Err(KindError::ScopeMismatch {
                kind,
                scope: self.describe(),
            })
        }
    }
}

/// A slug about to be assigned: the kind and scope it lives in, the identity of
/// the entity being written (None on create), and the display name to derive from.
#[derive(Debug, Clone)]
pub struct SlugCandidate {
    pub kind: EntityKind,
    pub scope: ParentScope,
    pub entity_id: Option<Uuid>,
    pub name: String,
}

/// Read-only persistence port: ids of same-kind siblings in the given scope
/// already holding this slug.
#[async_trait]
pub trait SiblingLookup: Send + Sync {
    async fn find_siblings(
        &self,
        kind: EntityKind,
        scope: &ParentScope,
        slug: &str,
    ) -> Result<Vec<Uuid>, DomainError>;
}

#[async_trait]
impl<L> SiblingLookup for &L
where
    L: SiblingLookup,
{
    async fn find_siblings(
        &self,
        kind: EntityKind,
        scope: &ParentScope,
        slug: &str,
    ) -> Result<Vec<Uuid>, DomainError> {
        (**self).find_siblings(kind, scope, slug).await
    }
}

/// Orchestrates slug derivation and validation for all four entity kinds.
///
/// The sibling check excludes the entity under validation by id, so updates that
/// leave the name unchanged revalidate against themselves and succeed. The
/// validate-then-write race is closed by the storage layer's unique indexes;
/// a unique violation on write maps back to the same duplicate-slug error.
pub struct LifecycleService<L> {
    siblings: L,
}

impl<L: SiblingLookup> LifecycleService<L> {
    pub fn new(siblings: L) -> Self {
        Self { siblings }
    }

    /// Derive the canonical slug for `candidate` and validate it, returning the
    /// slug to persist. Fails with a typed validation error; persists nothing.
    pub async fn prepare_and_validate(
        &self,
        candidate: &SlugCandidate,
    ) -> Result<String, DomainError> {
        candidate.scope.check_kind(candidate.kind)?;

        let slug = slugify(&candidate.name);
        if slug.is_empty() {
            return Err(DomainError::empty_name());
        }
        if is_reserved(&slug) {
            tracing::debug!(kind = ?candidate.kind, slug = %slug, "rejected reserved slug");
            return Err(DomainError::reserved_slug());
        }

        let siblings = self
            .siblings
            .find_siblings(candidate.kind, &candidate.scope, &slug)
            .await?;
        let collides = siblings.iter().any(|id| Some(*id) != candidate.entity_id);
        if collides {
            tracing::debug!(kind = ?candidate.kind, slug = %slug, "rejected duplicate slug");
            return Err(DomainError::duplicate_slug(candidate.kind));
        }

        Ok(slug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::InMemorySiblings;
    use uuid::Uuid;

    fn create(kind: EntityKind, scope: ParentScope, name: &str) -> SlugCandidate {
        SlugCandidate {
            kind,
            scope,
            entity_id: None,
            name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn assigns_normalized_slug() {
        let service = LifecycleService::new(InMemorySiblings::default());
        let slug = service
            .prepare_and_validate(&create(
                EntityKind::Restaurant,
                ParentScope::Global,
                "Test Restaurant",
            ))
            .await
            .unwrap();
        assert_eq!(slug, "test-restaurant");
    }

    #[tokio::test]
    async fn revalidation_with_same_name_is_idempotent() {
        let store = InMemorySiblings::default();
        let menu_id = Uuid::new_v4();
        let restaurant_id = Uuid::new_v4();
        store.insert(
            EntityKind::Menu,
            ParentScope::Restaurant(restaurant_id),
            "lunch",
            menu_id,
        );

        let service = LifecycleService::new(store);
        let candidate = SlugCandidate {
            kind: EntityKind::Menu,
            scope: ParentScope::Restaurant(restaurant_id),
            entity_id: Some(menu_id),
            name: "Lunch".to_string(),
        };

        let first = service.prepare_and_validate(&candidate).await.unwrap();
        let second = service.prepare_and_validate(&candidate).await.unwrap();
        assert_eq!(first, "lunch");
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn same_name_under_different_restaurants_is_allowed() {
        let store = InMemorySiblings::default();
        let r1 = Uuid::new_v4();
        let r2 = Uuid::new_v4();
        store.insert(
            EntityKind::Menu,
            ParentScope::Restaurant(r1),
            "specials",
            Uuid::new_v4(),
        );

        let service = LifecycleService::new(store);
        let slug = service
            .prepare_and_validate(&create(
                EntityKind::Menu,
                ParentScope::Restaurant(r2),
                "Specials",
            ))
            .await
            .unwrap();
        assert_eq!(slug, "specials");
    }

    #[tokio::test]
    async fn same_name_under_same_restaurant_collides() {
        let store = InMemorySiblings::default();
        let r1 = Uuid::new_v4();
        store.insert(
            EntityKind::Menu,
            ParentScope::Restaurant(r1),
            "specials",
            Uuid::new_v4(),
        );

        let service = LifecycleService::new(store);
        let err = service
            .prepare_and_validate(&create(
                EntityKind::Menu,
                ParentScope::Restaurant(r1),
                "Specials",
            ))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::DuplicateSlug { .. }));
    }

    #[tokio::test]
    async fn reserved_names_rejected_at_every_level() {
        let service = LifecycleService::new(InMemorySiblings::default());
        let cases = [
            create(EntityKind::Restaurant, ParentScope::Global, "All"),
            create(
                EntityKind::Menu,
                ParentScope::Restaurant(Uuid::new_v4()),
                "Edit",
            ),
            create(
                EntityKind::MenuSection,
                ParentScope::Menu(Uuid::new_v4()),
                "all",
            ),
            create(
                EntityKind::MenuItem,
                ParentScope::MenuSection(Uuid::new_v4()),
                "New Item",
            ),
        ];
        for candidate in cases {
            let err = service.prepare_and_validate(&candidate).await.unwrap_err();
            assert!(matches!(err, DomainError::ReservedSlug { .. }));
        }
    }

    #[tokio::test]
    async fn empty_name_is_rejected() {
        let service = LifecycleService::new(InMemorySiblings::default());
        let err = service
            .prepare_and_validate(&create(EntityKind::Restaurant, ParentScope::Global, "!!!"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::EmptyName { .. }));
    }

    #[tokio::test]
    async fn scope_shape_must_match_kind() {
        let service = LifecycleService::new(InMemorySiblings::default());
        let err = service
            .prepare_and_validate(&create(
                EntityKind::Restaurant,
                ParentScope::Menu(Uuid::new_v4()),
                "Test Restaurant",
            ))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Kind(KindError::ScopeMismatch { .. })));
    }
}
