use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockbook_core::{BusinessId, CustomerId, InvoiceId, SaleId};

/// A sale record: the denormalized mirror of an invoice's total, used for
/// reporting.
///
/// A sale exists iff its invoice exists; it is created and deleted with the
/// invoice and has no independent create/update path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sale {
    pub id: SaleId,
    pub invoice_id: InvoiceId,
    pub customer_id: CustomerId,
    pub business_id: BusinessId,
    /// Kept in lockstep with the invoice total, in smallest currency unit.
    pub total: u64,
    pub created_at: DateTime<Utc>,
}
