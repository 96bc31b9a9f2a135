//! Operations, one file per domain area.
//!
//! Every method takes the explicit actor resolved by
//! [`crate::Services::authenticate`] and checks the authorization gate
//! before touching state. Mutations run inside one store transaction:
//! stock deltas, document writes, and audit entries commit or roll back
//! together.

pub mod activity;
pub mod businesses;
pub mod customers;
pub mod invoices;
pub mod products;
pub mod sales;
pub mod users;
