//! `stockbook-auth` — authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: the gate is
//! pure policy over an explicit actor, and credential hashing / token
//! issuance sit behind trait seams.

pub mod actor;
pub mod claims;
pub mod gate;
pub mod password;
pub mod roles;
pub mod tokens;
pub mod user;

pub use actor::Actor;
pub use claims::{AuthClaims, TokenValidationError, validate_claims};
pub use gate::{business_scope, can_access, ensure_access, ensure_platform};
pub use password::{Argon2Hasher, PasswordHasher};
pub use roles::Role;
pub use tokens::{Hs256TokenCodec, TokenCodec};
pub use user::User;
