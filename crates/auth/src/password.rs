use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, SaltString};
use argon2::password_hash::{PasswordHasher as _, PasswordVerifier as _};

use stockbook_core::{DomainError, DomainResult};

/// Credential hashing seam.
///
/// Operations treat hashing as opaque; Argon2 below is the default
/// implementation.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, plain: &str) -> DomainResult<String>;

    /// Constant-shape verification: `false` for mismatch *and* for
    /// unparseable stored hashes.
    fn verify(&self, plain: &str, hashed: &str) -> bool;
}

/// Argon2id with library defaults.
#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2Hasher;

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, plain: &str) -> DomainResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(plain.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| DomainError::storage(format!("password hash: {e}")))
    }

    fn verify(&self, plain: &str, hashed: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(hashed) else {
            return false;
        };
        Argon2::default()
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok()
    }
}
