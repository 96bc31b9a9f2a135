use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockbook_core::{BusinessId, UserId};

use crate::{Actor, Role};

/// A user account document.
///
/// `password_hash` is a PHC string produced by a [`crate::PasswordHasher`];
/// it must never appear in API views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    /// `None` for platform accounts.
    pub business_id: Option<BusinessId>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// The actor this account authenticates as.
    pub fn actor(&self) -> Actor {
        Actor::new(self.id, self.role, self.business_id)
    }
}
