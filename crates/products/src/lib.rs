//! Product catalog domain module.
//!
//! The stock arithmetic here is pure; the ledger in the operation layer
//! applies it inside a unit of work and emits the audit trail.

pub mod product;

pub use product::{DEFAULT_LOW_STOCK_AMOUNT, Product};
