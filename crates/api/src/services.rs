//! Service wiring: the store plus the security seams.

use chrono::{Duration, Utc};

use stockbook_auth::{Argon2Hasher, AuthClaims, Hs256TokenCodec, PasswordHasher, TokenCodec, User};
use stockbook_core::DomainResult;
use stockbook_infra::UnitOfWork;

use crate::ApiConfig;

/// The operation layer. One instance per process; cheap to share behind an
/// `Arc` by whatever binds the API.
pub struct Services<S> {
    pub(crate) store: S,
    pub(crate) tokens: Box<dyn TokenCodec>,
    pub(crate) passwords: Box<dyn PasswordHasher>,
    pub(crate) token_ttl: Duration,
}

impl<S: UnitOfWork> Services<S> {
    /// Wire up with the default security stack (HS256 tokens, Argon2
    /// hashing).
    pub fn new(store: S, config: &ApiConfig) -> Self {
        Self {
            store,
            tokens: Box::new(Hs256TokenCodec::new(config.jwt_secret.as_bytes())),
            passwords: Box::new(Argon2Hasher),
            token_ttl: Duration::minutes(config.token_lifetime_minutes),
        }
    }

    /// Swap the security seams (tests, alternative deployments).
    pub fn with_security(
        mut self,
        tokens: Box<dyn TokenCodec>,
        passwords: Box<dyn PasswordHasher>,
    ) -> Self {
        self.tokens = tokens;
        self.passwords = passwords;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Issue a bearer token for `user` with the configured lifetime.
    pub(crate) fn issue_token(&self, user: &User) -> DomainResult<String> {
        let now = Utc::now();
        let claims = AuthClaims {
            sub: user.id,
            role: user.role,
            issued_at: now,
            expires_at: now + self.token_ttl,
        };
        self.tokens.issue(&claims)
    }
}
