//! `stockbook-api` — the operation layer behind the GraphQL surface.
//!
//! Every Query/Mutation of the schema exists here as a typed method on
//! [`Services`], taking an explicit [`stockbook_auth::Actor`] and returning
//! domain results. A GraphQL binding (or any other transport) is a thin
//! adapter: resolve the bearer token with [`Services::authenticate`], then
//! call the operation.
//!
//! Layout:
//! - `services.rs`: wiring (store + security seams)
//! - `context.rs`: token → actor resolution, list scoping
//! - `stock.rs`: the stock ledger, the single choke point for quantity
//!   changes
//! - `ops/`: operations, one file per domain area
//! - `dto.rs` / `views.rs`: inputs and reference-resolved outputs

pub mod config;
pub mod context;
pub mod dto;
pub mod ops;
pub mod services;
pub mod stock;
pub mod views;

pub use config::ApiConfig;
pub use services::Services;
