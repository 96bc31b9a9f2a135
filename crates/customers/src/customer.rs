use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockbook_core::{BusinessId, CustomerId};

/// A customer document.
///
/// Email is unique per business, not globally: the same person may be a
/// customer of several tenants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub business_id: BusinessId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}
