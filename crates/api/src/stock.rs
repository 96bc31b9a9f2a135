//! Stock ledger: the single choke point for product quantity changes.
//!
//! Invoice workflows and product updates alike route their deltas through
//! [`adjust_stock`]; nothing else writes `Product::quantity`.

use stockbook_auth::Actor;
use stockbook_core::{DomainResult, ProductId};
use stockbook_infra::{AuditAction, Documents};
use stockbook_products::Product;

/// Adjust a product's stock by `delta` inside the caller's transaction.
///
/// Fails with `NotFound` if the product is absent and `InsufficientStock`
/// if the delta would drive quantity negative (leaving the product
/// untouched — the surrounding transaction rolls back anything already
/// applied). Recomputes the low-stock alert and appends one audit entry
/// when the adjustment had an effect: a non-zero delta or an alert flip.
/// A threshold change with `delta == 0` that flips the alert still audits;
/// a true no-op does not.
///
/// `reason` prefixes the audit description ("Invoice creation",
/// "Invoice update", ...).
pub fn adjust_stock(
    docs: &mut Documents,
    actor: &Actor,
    product_id: &ProductId,
    delta: i64,
    reason: &str,
) -> DomainResult<Product> {
    let mut product = docs.product(product_id)?.clone();

    let alert_before = product.low_stock_alert;
    product.apply_delta(delta)?;
    let alert_changed = product.low_stock_alert != alert_before;

    docs.upsert_product(product.clone())?;

    if delta != 0 || alert_changed {
        tracing::debug!(
            product = %product.id,
            delta,
            quantity = product.quantity,
            low_stock_alert = product.low_stock_alert,
            "stock adjusted"
        );
        docs.record_activity(
            actor.user_id,
            "Product",
            AuditAction::Update,
            format!(
                "{reason}: stock of \"{}\" (SKU: {}) adjusted by {delta:+} to {} (low stock alert: {})",
                product.name, product.sku, product.quantity, product.low_stock_alert
            ),
        );
    }

    Ok(product)
}
