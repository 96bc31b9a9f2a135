use core::str::FromStr;
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockbook_core::{BusinessId, CustomerId, DomainError, DomainResult, InvoiceId, ProductId};

/// Invoice status lifecycle: starts `pending`, moves to `paid` or
/// `cancelled` by explicit update. Deletion is the terminal operation,
/// not a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Pending,
    Paid,
    Cancelled,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Cancelled => "cancelled",
        }
    }
}

impl core::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvoiceStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(InvoiceStatus::Pending),
            "paid" => Ok(InvoiceStatus::Paid),
            "cancelled" => Ok(InvoiceStatus::Cancelled),
            other => Err(DomainError::validation(format!(
                "unknown invoice status: {other}"
            ))),
        }
    }
}

/// One invoice line.
///
/// `price` is the unit price in smallest currency unit, fixed by the
/// caller at invoicing time and deliberately decoupled from the current
/// catalog price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceItem {
    pub product_id: ProductId,
    pub quantity: i64,
    pub price: u64,
}

/// An invoice document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: InvoiceId,
    pub customer_id: CustomerId,
    pub business_id: BusinessId,
    /// Ordered line items; mutable only via full replacement.
    pub items: Vec<InvoiceItem>,
    /// Always `Σ(item.quantity × item.price)` over the current items.
    pub total: u64,
    pub status: InvoiceStatus,
    pub created_at: DateTime<Utc>,
}

/// Validate items and compute the invoice total with checked arithmetic.
pub fn compute_total(items: &[InvoiceItem]) -> DomainResult<u64> {
    if items.is_empty() {
        return Err(DomainError::validation(
            "invoice requires at least one item",
        ));
    }

    let mut total: u64 = 0;
    for item in items {
        if item.quantity <= 0 {
            return Err(DomainError::validation(
                "invoice item quantity must be positive",
            ));
        }
        let line = (item.quantity as u128) * (item.price as u128);
        let line: u64 = line
            .try_into()
            .map_err(|_| DomainError::validation("invoice line total overflow"))?;
        total = total
            .checked_add(line)
            .ok_or_else(|| DomainError::validation("invoice total overflow"))?;
    }
    Ok(total)
}

/// Aggregate requested quantity per product (an item list may repeat a
/// product across lines; stock deltas are computed against these sums).
pub fn aggregate_quantities(items: &[InvoiceItem]) -> HashMap<ProductId, i64> {
    let mut agg: HashMap<ProductId, i64> = HashMap::new();
    for item in items {
        *agg.entry(item.product_id).or_insert(0) += item.quantity;
    }
    agg
}
