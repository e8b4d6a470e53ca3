use thiserror::Error;

use crate::domain::entity::EntityKind;

/// Contract violations around entity kinds. These signal integration bugs in the
/// caller, not user mistakes, and must propagate instead of degrading into a deny.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KindError {
    #[error("ownership chain for {child:?} must pass through a {expected:?}, found {found:?}")]
    MalformedChain {
        child: EntityKind,
        expected: EntityKind,
        found: EntityKind,
    },

    #[error("{kind:?} siblings cannot be scoped by {scope}")]
    ScopeMismatch { kind: EntityKind, scope: &'static str },
}

/// Validation and contract errors produced by the slug lifecycle.
///
/// `ReservedSlug` and `DuplicateSlug` are user-facing and recoverable; the caller
/// renders the message next to the offending name field. `Kind` is a programming
/// error. `Storage` wraps a failed sibling lookup.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    #[error("{message}")]
    ReservedSlug { message: String },

    #[error("{message}")]
    DuplicateSlug { message: String },

    #[error("{message}")]
    EmptyName { message: String },

    #[error("{message}")]
    RestaurantLimit { message: String },

    #[error(transparent)]
    Kind(#[from] KindError),

    #[error("storage error: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn reserved_slug() -> Self {
        DomainError::ReservedSlug {
            message: crate::domain::constants::RESERVED_KEYWORD_ERROR.to_string(),
        }
    }

    pub fn duplicate_slug(kind: EntityKind) -> Self {
        use crate::domain::constants::*;
        let message = match kind {
            EntityKind::Restaurant => RESTAURANT_DUPLICATE_SLUG_ERROR,
            EntityKind::Menu => MENU_DUPLICATE_SLUG_ERROR,
            EntityKind::MenuSection => MENUSECTION_DUPLICATE_SLUG_ERROR,
            EntityKind::MenuItem => MENUITEM_DUPLICATE_SLUG_ERROR,
        };
        DomainError::DuplicateSlug {
            message: message.to_string(),
        }
    }

    pub fn empty_name() -> Self {
        DomainError::EmptyName {
            message: crate::domain::constants::EMPTY_NAME_ERROR.to_string(),
        }
    }

    pub fn restaurant_limit() -> Self {
        DomainError::RestaurantLimit {
            message: crate::domain::constants::MAX_RESTAURANTS_PER_USER_ERROR.to_string(),
        }
    }

    /// True for errors the client can fix by changing input.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            DomainError::ReservedSlug { .. }
                | DomainError::DuplicateSlug { .. }
                | DomainError::EmptyName { .. }
                | DomainError::RestaurantLimit { .. }
        )
    }
}
