//! Audit trail types.
//!
//! Workflows treat audit logging as fire-and-forget: they hand over the
//! fields below and move on. Storage/format beyond these fields is not
//! this crate's concern.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockbook_core::{ActivityId, UserId};

/// What an audit entry records happening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
    Login,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Create => "create",
            AuditAction::Update => "update",
            AuditAction::Delete => "delete",
            AuditAction::Login => "login",
        }
    }
}

impl core::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One append-only audit record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityLog {
    pub id: ActivityId,
    pub user_id: UserId,
    /// Entity kind the action touched ("Product", "Invoice", ...).
    pub entity: String,
    pub action: AuditAction,
    pub description: String,
    pub when: DateTime<Utc>,
}

/// Collects old→new field changes into the audit description format.
#[derive(Debug, Default)]
pub struct ChangeSet {
    changes: Vec<String>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a field change; equal values are skipped.
    pub fn push(&mut self, field: &str, old: impl ToString, new: impl ToString) {
        let old = old.to_string();
        let new = new.to_string();
        if old != new {
            self.changes
                .push(format!("{field} from \"{old}\" to \"{new}\""));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// `Changes: a from "x" to "y", ...`, or `None` when nothing changed.
    pub fn describe(self) -> Option<String> {
        if self.changes.is_empty() {
            None
        } else {
            Some(format!("Changes: {}", self.changes.join(", ")))
        }
    }
}
