//! Authorization for mutating the restaurant hierarchy.
//!
//! Reads are public; writes require staff status or administrator membership of
//! the restaurant that owns the target entity. The gate is a stateless decision
//! function: it is handed the principal, the verb, and the entity (or, for
//! creation, the intended parent restaurant) explicitly.

use uuid::Uuid;

use crate::domain::entity::{Entity, Restaurant};
use crate::domain::error::{DomainError, KindError};

/// The acting principal, as supplied by the session layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Principal {
    Anonymous,
    User { id: Uuid, staff: bool },
}

impl Principal {
    pub fn user(id: Uuid) -> Self {
        Principal::User { id, staff: false }
    }

    pub fn staff(id: Uuid) -> Self {
        Principal::User { id, staff: true }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Principal::User { .. })
    }

    pub fn is_staff(&self) -> bool {
        matches!(self, Principal::User { staff: true, .. })
    }

    pub fn id(&self) -> Option<Uuid> {
        match self {
            Principal::Anonymous => None,
            Principal::User { id, .. } => Some(*id),
        }
    }
}

/// HTTP verbs, classified safe (read-only) or unsafe (mutating).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Get,
    Head,
    Options,
    Post,
    Put,
    Patch,
    Delete,
}

impl Verb {
    pub fn is_safe(&self) -> bool {
        matches!(self, Verb::Get | Verb::Head | Verb::Options)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }
}

/// Stateless authorization gate.
///
/// Precedence, first match wins:
/// 1. anonymous principal: safe verbs allowed (policy-controlled), everything
///    else denied
/// 2. staff: allowed
/// 3. safe verb: allowed
/// 4. administrator membership of the owning restaurant
///
/// Ownership resolution failures (malformed chains) propagate as kind errors
/// instead of collapsing into a deny, so integration bugs stay visible.
#[derive(Debug, Clone, Copy)]
pub struct AuthorizationGate {
    /// Whether anonymous principals may use safe verbs. Two historical policies
    /// disagreed here; allowing matches the public-read model and is the default.
    pub allow_anonymous_reads: bool,
}

impl Default for AuthorizationGate {
    fn default() -> Self {
        Self {
            allow_anonymous_reads: true,
        }
    }
}

impl AuthorizationGate {
    pub fn from_config() -> Self {
        Self {
            allow_anonymous_reads: crate::config::config().security.allow_anonymous_reads,
        }
    }

    /// Authorize a verb against an existing entity with a loaded ownership chain.
    pub fn authorize(
        &self,
        principal: &Principal,
        verb: Verb,
        entity: &Entity,
    ) -> Result<Decision, KindError> {
        if let Some(decision) = self.pre_ownership_decision(principal, verb) {
            return Ok(decision);
        }
        let owner = entity.resolve_owner()?;
        Ok(self.membership_decision(principal, owner))
    }

    /// Authorize a creation flow against the intended parent restaurant.
    ///
    /// At creation time the child has no persisted identity, so membership is
    /// tested directly on the restaurant the caller wants to create under.
    pub fn authorize_in(
        &self,
        principal: &Principal,
        verb: Verb,
        restaurant: &Restaurant,
    ) -> Decision {
        if let Some(decision) = self.pre_ownership_decision(principal, verb) {
            return decision;
        }
        self.membership_decision(principal, restaurant)
    }

    fn pre_ownership_decision(&self, principal: &Principal, verb: Verb) -> Option<Decision> {
        if !principal.is_authenticated() {
            return Some(if verb.is_safe() && self.allow_anonymous_reads {
                Decision::Allow
            } else {
                Decision::Deny
            });
        }
        if principal.is_staff() {
            return Some(Decision::Allow);
        }
        if verb.is_safe() {
            return Some(Decision::Allow);
        }
        None
    }

    fn membership_decision(&self, principal: &Principal, owner: &Restaurant) -> Decision {
        match principal.id() {
            Some(user_id) if owner.is_admin(user_id) => Decision::Allow,
            _ => Decision::Deny,
        }
    }
}

/// Per-user registration cap: a non-staff principal already administrating
/// `administered` restaurants may not create another once the limit is reached.
/// Staff are exempt.
pub fn check_restaurant_quota(
    principal: &Principal,
    administered: i64,
    limit: u32,
) -> Result<(), DomainError> {
    if !principal.is_staff() && administered >= i64::from(limit) {
        return Err(DomainError::restaurant_limit());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::EntityKind;
    use crate::testing::factories;
    use uuid::Uuid;

    fn gate() -> AuthorizationGate {
        AuthorizationGate::default()
    }

    #[test]
    fn staff_allowed_for_every_verb() {
        let admin = Uuid::new_v4();
        let restaurant = factories::restaurant("Test Restaurant", &[admin]);
        let entity = Entity::Restaurant(restaurant);
        let staff = Principal::staff(Uuid::new_v4());

        for verb in [Verb::Get, Verb::Post, Verb::Put, Verb::Delete] {
            assert_eq!(
                gate().authorize(&staff, verb, &entity).unwrap(),
                Decision::Allow
            );
        }
    }

    #[test]
    fn anonymous_allowed_only_for_safe_verbs() {
        let restaurant = factories::restaurant("Test Restaurant", &[]);
        let entity = Entity::Restaurant(restaurant);
        let anon = Principal::Anonymous;

        assert_eq!(
            gate().authorize(&anon, Verb::Get, &entity).unwrap(),
            Decision::Allow
        );
        assert_eq!(
            gate().authorize(&anon, Verb::Put, &entity).unwrap(),
            Decision::Deny
        );
    }

    #[test]
    fn anonymous_reads_can_be_disabled_by_policy() {
        let restaurant = factories::restaurant("Test Restaurant", &[]);
        let entity = Entity::Restaurant(restaurant);
        let strict = AuthorizationGate {
            allow_anonymous_reads: false,
        };

        assert_eq!(
            strict
                .authorize(&Principal::Anonymous, Verb::Get, &entity)
                .unwrap(),
            Decision::Deny
        );
    }

    #[test]
    fn authenticated_non_admin_reads_but_cannot_write() {
        let admin = Uuid::new_v4();
        let restaurant = factories::restaurant("Test Restaurant", &[admin]);
        let entity = Entity::Restaurant(restaurant);
        let outsider = Principal::user(Uuid::new_v4());

        assert_eq!(
            gate().authorize(&outsider, Verb::Get, &entity).unwrap(),
            Decision::Allow
        );
        assert_eq!(
            gate().authorize(&outsider, Verb::Delete, &entity).unwrap(),
            Decision::Deny
        );
    }

    #[test]
    fn admin_allowed_beneath_own_restaurant_only() {
        let admin = Uuid::new_v4();
        let mine = factories::restaurant("Mine", &[admin]);
        let theirs = factories::restaurant("Theirs", &[Uuid::new_v4()]);
        let my_menu = factories::menu(&mine, "Lunch");
        let their_menu = factories::menu(&theirs, "Lunch");

        let my_entity = Entity::Menu {
            menu: my_menu,
            parent: Box::new(Entity::Restaurant(mine)),
        };
        let their_entity = Entity::Menu {
            menu: their_menu,
            parent: Box::new(Entity::Restaurant(theirs)),
        };

        let principal = Principal::user(admin);
        assert_eq!(
            gate().authorize(&principal, Verb::Put, &my_entity).unwrap(),
            Decision::Allow
        );
        assert_eq!(
            gate()
                .authorize(&principal, Verb::Put, &their_entity)
                .unwrap(),
            Decision::Deny
        );
    }

    #[test]
    fn creation_gate_tests_intended_parent() {
        let admin = Uuid::new_v4();
        let restaurant = factories::restaurant("Test Restaurant", &[admin]);

        assert_eq!(
            gate().authorize_in(&Principal::user(admin), Verb::Post, &restaurant),
            Decision::Allow
        );
        assert_eq!(
            gate().authorize_in(&Principal::user(Uuid::new_v4()), Verb::Post, &restaurant),
            Decision::Deny
        );
    }

    #[test]
    fn restaurant_quota_blocks_at_limit() {
        let principal = Principal::user(Uuid::new_v4());

        assert!(check_restaurant_quota(&principal, 0, 3).is_ok());
        assert!(check_restaurant_quota(&principal, 2, 3).is_ok());

        let err = check_restaurant_quota(&principal, 3, 3).unwrap_err();
        assert!(matches!(err, DomainError::RestaurantLimit { .. }));
        assert!(err.to_string().contains("cannot register more than 3"));
    }

    #[test]
    fn staff_exempt_from_restaurant_quota() {
        let staff = Principal::staff(Uuid::new_v4());
        assert!(check_restaurant_quota(&staff, 100, 3).is_ok());
    }

    #[test]
    fn malformed_chain_surfaces_kind_error_not_deny() {
        let admin = Uuid::new_v4();
        let restaurant = factories::restaurant("Test Restaurant", &[admin]);
        let menu = factories::menu(&restaurant, "Lunch");
        let section = factories::menu_section(&menu, "Mains");

        let broken = Entity::MenuSection {
            section,
            parent: Box::new(Entity::Restaurant(restaurant)),
        };

        let err = gate()
            .authorize(&Principal::user(admin), Verb::Put, &broken)
            .unwrap_err();
        assert!(matches!(
            err,
            KindError::MalformedChain {
                child: EntityKind::MenuSection,
                ..
            }
        ));
    }
}
