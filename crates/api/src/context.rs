//! Request context resolution: bearer token → explicit actor.

use chrono::Utc;

use stockbook_auth::Actor;
use stockbook_core::{BusinessId, DomainError, DomainResult};
use stockbook_infra::UnitOfWork;

use crate::Services;

impl<S: UnitOfWork> Services<S> {
    /// Resolve a bearer token into the actor every operation takes.
    ///
    /// The user document is re-read per request, so role changes and
    /// deletions take effect immediately regardless of what the token
    /// claims. `login`/`register` are the only operations exempt from
    /// this.
    pub fn authenticate(&self, token: Option<&str>) -> DomainResult<Actor> {
        let token = token.ok_or(DomainError::NotAuthenticated)?;
        let claims = self.tokens.decode(token, Utc::now())?;

        self.store.read(|docs| {
            let user = docs
                .user(&claims.sub)
                .map_err(|_| DomainError::NotAuthenticated)?;
            Ok(user.actor())
        })
    }
}

/// Visibility scope for list queries: platform sees every business,
/// everyone else exactly their own.
pub(crate) fn list_scope(actor: &Actor) -> DomainResult<Option<BusinessId>> {
    if actor.is_platform() {
        return Ok(None);
    }
    match actor.business_id {
        Some(business_id) => Ok(Some(business_id)),
        None => Err(DomainError::Unauthorized),
    }
}
