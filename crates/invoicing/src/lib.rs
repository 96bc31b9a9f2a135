//! Invoicing domain module.
//!
//! Pure invoice rules: item validation, checked total computation, and the
//! per-product quantity aggregation the update workflow diffs against.
//! Orchestration (stock deltas, persistence, audit) lives in the operation
//! layer.

pub mod invoice;

pub use invoice::{Invoice, InvoiceItem, InvoiceStatus, aggregate_quantities, compute_total};
