use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use stockbook_core::{DomainError, DomainResult, UserId};

use crate::{AuthClaims, Role, validate_claims};

/// Token issuance/verification seam.
///
/// The operation layer depends on this trait only; HS256 below is the
/// default implementation, swappable by whatever binds the API.
pub trait TokenCodec: Send + Sync {
    fn issue(&self, claims: &AuthClaims) -> DomainResult<String>;

    /// Decode and validate a bearer token. Any failure is
    /// `NotAuthenticated` — callers never learn why a token was bad.
    fn decode(&self, token: &str, now: DateTime<Utc>) -> DomainResult<AuthClaims>;
}

/// Wire form of the claims (numeric timestamps, as JWT expects).
#[derive(Debug, Serialize, Deserialize)]
struct WireClaims {
    sub: UserId,
    role: Role,
    iat: i64,
    exp: i64,
}

/// HS256 JWT codec.
pub struct Hs256TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl Hs256TokenCodec {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }
}

impl TokenCodec for Hs256TokenCodec {
    fn issue(&self, claims: &AuthClaims) -> DomainResult<String> {
        let wire = WireClaims {
            sub: claims.sub,
            role: claims.role,
            iat: claims.issued_at.timestamp(),
            exp: claims.expires_at.timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &wire, &self.encoding)
            .map_err(|e| DomainError::storage(format!("token encode: {e}")))
    }

    fn decode(&self, token: &str, now: DateTime<Utc>) -> DomainResult<AuthClaims> {
        // Time-window checks are done deterministically by `validate_claims`,
        // not by the JWT library.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let data = decode::<WireClaims>(token, &self.decoding, &validation)
            .map_err(|_| DomainError::NotAuthenticated)?;

        let issued_at = DateTime::from_timestamp(data.claims.iat, 0)
            .ok_or(DomainError::NotAuthenticated)?;
        let expires_at = DateTime::from_timestamp(data.claims.exp, 0)
            .ok_or(DomainError::NotAuthenticated)?;

        let claims = AuthClaims {
            sub: data.claims.sub,
            role: data.claims.role,
            issued_at,
            expires_at,
        };
        validate_claims(&claims, now).map_err(|_| DomainError::NotAuthenticated)?;
        Ok(claims)
    }
}
