use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockbook_core::{BusinessId, DomainError, DomainResult, ProductId};

/// Low-stock threshold applied when the caller does not supply one.
pub const DEFAULT_LOW_STOCK_AMOUNT: i64 = 10;

/// A catalog product document.
///
/// SKU is unique per business. `quantity` never goes negative and is
/// mutated only through [`Product::apply_delta`] (the stock ledger's
/// choke point); `low_stock_alert` is derived and recomputed on every
/// quantity or threshold change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub business_id: BusinessId,
    pub name: String,
    pub brand: String,
    pub sku: String,
    /// Units on hand.
    pub quantity: i64,
    /// Unit price in smallest currency unit (e.g., cents).
    pub price: u64,
    /// Threshold at or below which the low-stock alert raises.
    pub low_stock_amount: i64,
    /// Derived: `quantity <= low_stock_amount`.
    pub low_stock_alert: bool,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Recompute the derived low-stock flag. Returns whether it changed.
    pub fn recompute_low_stock(&mut self) -> bool {
        let alert = self.quantity <= self.low_stock_amount;
        let changed = alert != self.low_stock_alert;
        self.low_stock_alert = alert;
        changed
    }

    /// Apply a signed stock delta.
    ///
    /// Fails with `InsufficientStock` — leaving the product untouched — if
    /// the delta would drive quantity negative; otherwise updates quantity
    /// and the low-stock flag.
    pub fn apply_delta(&mut self, delta: i64) -> DomainResult<()> {
        let new_quantity = self
            .quantity
            .checked_add(delta)
            .ok_or_else(|| DomainError::validation("stock delta overflow"))?;
        if new_quantity < 0 {
            return Err(DomainError::insufficient_stock(
                self.name.clone(),
                self.sku.clone(),
            ));
        }
        self.quantity = new_quantity;
        self.recompute_low_stock();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(quantity: i64, low_stock_amount: i64) -> Product {
        let mut p = Product {
            id: ProductId::new(),
            business_id: BusinessId::new(),
            name: "Widget".to_string(),
            brand: "Acme".to_string(),
            sku: "WID-1".to_string(),
            quantity,
            price: 500,
            low_stock_amount,
            low_stock_alert: false,
            created_at: Utc::now(),
        };
        p.recompute_low_stock();
        p
    }

    #[test]
    fn deduction_updates_quantity_and_alert() {
        let mut p = product(12, 10);
        assert!(!p.low_stock_alert);

        p.apply_delta(-3).unwrap();
        assert_eq!(p.quantity, 9);
        assert!(p.low_stock_alert);
    }

    #[test]
    fn restock_clears_alert() {
        let mut p = product(5, 10);
        assert!(p.low_stock_alert);

        p.apply_delta(20).unwrap();
        assert_eq!(p.quantity, 25);
        assert!(!p.low_stock_alert);
    }

    #[test]
    fn overdraw_fails_and_leaves_product_unchanged() {
        let mut p = product(10, 3);
        let before = p.clone();

        let err = p.apply_delta(-11).unwrap_err();
        match err {
            DomainError::InsufficientStock { name, sku } => {
                assert_eq!(name, "Widget");
                assert_eq!(sku, "WID-1");
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }
        assert_eq!(p, before);
    }

    #[test]
    fn draining_to_zero_is_allowed() {
        let mut p = product(4, 3);
        p.apply_delta(-4).unwrap();
        assert_eq!(p.quantity, 0);
        assert!(p.low_stock_alert);
    }

    #[test]
    fn threshold_change_recomputes_alert() {
        let mut p = product(8, 3);
        assert!(!p.low_stock_alert);

        p.low_stock_amount = 8;
        assert!(p.recompute_low_stock());
        assert!(p.low_stock_alert);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 1000,
                ..ProptestConfig::default()
            })]

            /// Property: after any delta sequence, quantity is never
            /// negative and the alert always equals the threshold test;
            /// rejected deltas leave the product untouched.
            #[test]
            fn stock_invariants_hold(
                start in 0i64..10_000,
                threshold in 0i64..5_000,
                deltas in proptest::collection::vec(-500i64..500, 0..32),
            ) {
                let mut p = product(start, threshold);
                for delta in deltas {
                    let before = p.clone();
                    match p.apply_delta(delta) {
                        Ok(()) => {
                            prop_assert_eq!(p.quantity, before.quantity + delta);
                        }
                        Err(_) => {
                            prop_assert_eq!(&p, &before);
                        }
                    }
                    prop_assert!(p.quantity >= 0);
                    prop_assert_eq!(
                        p.low_stock_alert,
                        p.quantity <= p.low_stock_amount
                    );
                }
            }
        }
    }
}
