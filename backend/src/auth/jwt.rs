//! Signed, time-limited bearer tokens
//!
//! Tokens are standard three-segment JWTs signed with HS256. Claims are a
//! flat `{id, email, expires}` map. `expires` is checked here instead of by
//! `jsonwebtoken` because it is not the registered `exp` claim.
//!
//! Keys are derived once from the configured secret and shared behind
//! `Arc`, so cloning a codec is cheap.

use super::error::{ConfigError, TokenError};
use crate::config::JwtConfig;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use user_service_shared::Identity;

/// The only accepted signing algorithm
pub const ALGORITHM: Algorithm = Algorithm::HS256;

/// Token claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub id: i64,
    pub email: String,
    /// Expiration time (Unix seconds)
    pub expires: i64,
}

impl Claims {
    pub fn identity(&self) -> Identity {
        Identity {
            id: self.id,
            email: self.email.clone(),
        }
    }
}

/// Pre-computed signing keys
#[derive(Clone)]
pub struct JwtKeys {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
}

impl JwtKeys {
    fn new(secret: &str) -> Self {
        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
            decoding: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
        }
    }
}

/// Issues and verifies tokens
///
/// Build one at startup with [`TokenCodec::new`] and share it through
/// `AppState`.
#[derive(Clone)]
pub struct TokenCodec {
    keys: JwtKeys,
    validation: Arc<Validation>,
    ttl: Duration,
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &ALGORITHM)
            .field("ttl_secs", &self.ttl.num_seconds())
            .finish_non_exhaustive()
    }
}

impl TokenCodec {
    /// Create a codec from configuration
    ///
    /// Fails when the secret is empty or the TTL is not positive. Treat
    /// either as fatal at startup.
    pub fn new(config: &JwtConfig) -> Result<Self, ConfigError> {
        if config.secret.trim().is_empty() {
            return Err(ConfigError::MissingSecret);
        }
        if config.token_ttl_secs <= 0 {
            return Err(ConfigError::InvalidTtl(config.token_ttl_secs));
        }

        let mut validation = Validation::new(ALGORITHM);
        validation.required_spec_claims = HashSet::new();
        validation.validate_exp = false;
        validation.validate_aud = false;

        Ok(Self {
            keys: JwtKeys::new(&config.secret),
            validation: Arc::new(validation),
            ttl: Duration::seconds(config.token_ttl_secs),
        })
    }

    /// Configured token lifetime
    #[inline]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for `identity` that expires `ttl` from now
    #[inline]
    pub fn issue(&self, identity: &Identity, ttl: Duration) -> Result<String, TokenError> {
        self.issue_at(identity, ttl, Utc::now())
    }

    /// Issue a token as if the current time were `issued_at`
    pub fn issue_at(
        &self,
        identity: &Identity,
        ttl: Duration,
        issued_at: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let expires = issued_at
            .checked_add_signed(ttl)
            .ok_or_else(|| TokenError::Encoding("expiry out of range".to_string()))?;

        let claims = Claims {
            id: identity.id,
            email: identity.email.clone(),
            expires: expires.timestamp(),
        };

        encode(&Header::new(ALGORITHM), &claims, &self.keys.encoding)
            .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    /// Verify a token and return its claims
    #[inline]
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify a token as if the current time were `now`
    ///
    /// A token is still valid at the exact second it expires.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let data = decode::<Claims>(token, &self.keys.decoding, &self.validation)
            .map_err(classify)?;

        if now.timestamp() > data.claims.expires {
            return Err(TokenError::Expired);
        }

        Ok(data.claims)
    }
}

fn classify(err: jsonwebtoken::errors::Error) -> TokenError {
    match err.kind() {
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => TokenError::InvalidSignature,
        _ => TokenError::Malformed,
    }
}
