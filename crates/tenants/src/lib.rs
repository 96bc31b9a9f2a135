//! Tenancy domain module.
//!
//! A business is the unit of tenant isolation: every product, customer,
//! invoice, and sale belongs to exactly one.

pub mod business;

pub use business::{Business, BusinessKind};
