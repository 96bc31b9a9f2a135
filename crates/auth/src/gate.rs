//! Authorization gate: pure policy checks over an explicit actor.
//!
//! - No IO
//! - No panics
//! - No business logic

use stockbook_core::{BusinessId, DomainError, DomainResult};

use crate::{Actor, Role};

/// Whether `actor` may act on a resource owned by `target`.
///
/// Platform accounts are always authorized; everyone else only within the
/// business they are attached to.
pub fn can_access(actor: &Actor, target: BusinessId) -> bool {
    if actor.role == Role::Platform {
        return true;
    }
    match actor.business_id {
        Some(own) => own == target,
        None => false,
    }
}

/// `can_access` as a check, failing with `Unauthorized`.
pub fn ensure_access(actor: &Actor, target: BusinessId) -> DomainResult<()> {
    if can_access(actor, target) {
        Ok(())
    } else {
        Err(DomainError::Unauthorized)
    }
}

/// Restrict an operation to platform accounts (user/business administration).
pub fn ensure_platform(actor: &Actor) -> DomainResult<()> {
    if actor.role == Role::Platform {
        Ok(())
    } else {
        Err(DomainError::Unauthorized)
    }
}

/// Resolve the business a creation-side operation acts on.
///
/// Platform accounts own no business and cannot create business-scoped
/// records; non-platform accounts must be attached to one.
pub fn business_scope(actor: &Actor) -> DomainResult<BusinessId> {
    if actor.role == Role::Platform {
        return Err(DomainError::validation(
            "platform accounts are not attached to a business",
        ));
    }
    actor.business_id.ok_or(DomainError::Unauthorized)
}
