use serde::{Deserialize, Serialize};

use stockbook_core::{BusinessId, UserId};

use crate::Role;

/// The authenticated caller, resolved once per request and passed
/// explicitly into every operation (no ambient "current user").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: UserId,
    pub role: Role,
    /// The business this actor is attached to. Always `None` for
    /// platform accounts.
    pub business_id: Option<BusinessId>,
}

impl Actor {
    pub fn new(user_id: UserId, role: Role, business_id: Option<BusinessId>) -> Self {
        Self {
            user_id,
            role,
            business_id,
        }
    }

    pub fn is_platform(&self) -> bool {
        self.role == Role::Platform
    }
}
