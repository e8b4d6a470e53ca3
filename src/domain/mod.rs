pub mod constants;
pub mod entity;
pub mod error;
pub mod lifecycle;
pub mod permissions;
pub mod slug;

pub use entity::{Entity, EntityKind, Menu, MenuItem, MenuSection, Restaurant};
pub use error::{DomainError, KindError};
pub use lifecycle::{LifecycleService, ParentScope, SiblingLookup, SlugCandidate};
pub use permissions::{AuthorizationGate, Decision, Principal, Verb};
