use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockbook_core::{BusinessId, DomainError};

/// Business kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BusinessKind {
    Store,
    Franchise,
    Platform,
}

impl BusinessKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BusinessKind::Store => "store",
            BusinessKind::Franchise => "franchise",
            BusinessKind::Platform => "platform",
        }
    }
}

impl core::fmt::Display for BusinessKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BusinessKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "store" => Ok(BusinessKind::Store),
            "franchise" => Ok(BusinessKind::Franchise),
            "platform" => Ok(BusinessKind::Platform),
            other => Err(DomainError::validation(format!(
                "unknown business type: {other}"
            ))),
        }
    }
}

/// A business document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Business {
    pub id: BusinessId,
    /// Human-facing sequential number (BID), unique across the platform
    /// and issued by the counter sequence at creation.
    pub bid: u64,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub kind: BusinessKind,
    pub created_at: DateTime<Utc>,
}
