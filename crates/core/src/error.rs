//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Every operation surfaces exactly one of these to the caller as its
/// failure. Keep this focused on deterministic business/domain failures;
/// transport concerns belong to whatever binds the API.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// No bearer token, or a token that failed decoding/validation.
    #[error("not authenticated")]
    NotAuthenticated,

    /// Authenticated, but out of scope for the target business.
    #[error("unauthorized")]
    Unauthorized,

    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A referenced entity is absent.
    #[error("not found: {0}")]
    NotFound(String),

    /// The entity exists but belongs to a different business.
    #[error("invalid reference: {0}")]
    InvalidReference(String),

    /// Applying the requested stock delta would drive quantity negative.
    #[error("insufficient stock for \"{name}\" (SKU: {sku})")]
    InsufficientStock { name: String, sku: String },

    /// Login failure: unknown username or password mismatch.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Unique constraint violation (username, SKU, email).
    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    /// The operation conflicts with existing state (e.g. restrict-delete).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Storage failure outside the domain's control.
    #[error("storage failure: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn invalid_reference(msg: impl Into<String>) -> Self {
        Self::InvalidReference(msg.into())
    }

    pub fn insufficient_stock(name: impl Into<String>, sku: impl Into<String>) -> Self {
        Self::InsufficientStock {
            name: name.into(),
            sku: sku.into(),
        }
    }

    pub fn duplicate_key(msg: impl Into<String>) -> Self {
        Self::DuplicateKey(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}
