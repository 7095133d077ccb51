//! Password hashing using bcrypt
//!
//! Provides salted, adaptive hashing and constant-time verification.
//!
//! # Performance Considerations
//!
//! Bcrypt is intentionally CPU-intensive. Request handlers should use the
//! `_async` variants, which run on the blocking thread pool.

use secrecy::{ExposeSecret, SecretString};
use std::sync::OnceLock;
use thiserror::Error;
use user_service_shared::validation::MAX_PASSWORD_LEN;

/// Work factor used for every stored hash
pub const DEFAULT_COST: u32 = 12;

const DUMMY_PASSWORD: &str = "no-such-user-placeholder";

#[allow(clippy::declare_interior_mutable_const)]
const EMPTY_SLOT: OnceLock<String> = OnceLock::new();

/// One decoy hash per bcrypt cost (4..=31), filled on first use
static DUMMY_HASHES: [OnceLock<String>; 32] = [EMPTY_SLOT; 32];

/// Hashing failed inside bcrypt or its worker task
#[derive(Error, Debug)]
#[error("password hashing failed: {0}")]
pub struct HashingError(String);

/// Password hashing service
#[derive(Debug, Clone, Copy)]
pub struct PasswordService {
    cost: u32,
}

impl Default for PasswordService {
    fn default() -> Self {
        Self { cost: DEFAULT_COST }
    }
}

impl PasswordService {
    /// Use a different work factor
    ///
    /// Production code uses [`PasswordService::default`]. Lower costs are
    /// for tests where thousands of hashes would otherwise take minutes.
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a password (blocking operation)
    ///
    /// Passwords longer than [`MAX_PASSWORD_LEN`] bytes are refused; bcrypt
    /// would silently drop the tail.
    pub fn hash(&self, password: &str) -> Result<String, HashingError> {
        if password.len() > MAX_PASSWORD_LEN {
            return Err(HashingError(format!(
                "password exceeds {} bytes",
                MAX_PASSWORD_LEN
            )));
        }
        bcrypt::hash(password, self.cost).map_err(|e| HashingError(e.to_string()))
    }

    /// Verify a password against a hash (blocking operation)
    ///
    /// A hash that cannot be parsed verifies as `false`. Callers only ever
    /// learn "match" or "no match". A password over [`MAX_PASSWORD_LEN`]
    /// bytes never matches, since [`hash`](Self::hash) cannot produce one.
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        if password.len() > MAX_PASSWORD_LEN {
            return false;
        }
        bcrypt::verify(password, hash).unwrap_or(false)
    }

    /// Decoy hash at this service's cost
    ///
    /// Verifying against it costs the same as verifying a real credential.
    pub fn dummy_hash(&self) -> Result<&'static str, HashingError> {
        let cell = DUMMY_HASHES
            .get(self.cost as usize)
            .ok_or_else(|| HashingError(format!("invalid cost {}", self.cost)))?;
        if let Some(hash) = cell.get() {
            return Ok(hash.as_str());
        }
        let hash = self.hash(DUMMY_PASSWORD)?;
        Ok(cell.get_or_init(|| hash).as_str())
    }

    /// Hash a password on the blocking thread pool
    pub async fn hash_async(&self, password: SecretString) -> Result<String, HashingError> {
        let service = *self;
        tokio::task::spawn_blocking(move || service.hash(password.expose_secret()))
            .await
            .map_err(|e| HashingError(format!("task join error: {}", e)))?
    }

    /// Verify a password on the blocking thread pool
    pub async fn verify_async(
        &self,
        password: SecretString,
        hash: String,
    ) -> Result<bool, HashingError> {
        let service = *self;
        tokio::task::spawn_blocking(move || service.verify(password.expose_secret(), &hash))
            .await
            .map_err(|e| HashingError(format!("task join error: {}", e)))
    }

    /// Burn one verification for a credential that does not exist
    ///
    /// Keeps a lookup miss as slow as a wrong password.
    pub async fn verify_dummy_async(&self, password: SecretString) -> Result<(), HashingError> {
        let service = *self;
        tokio::task::spawn_blocking(move || -> Result<(), HashingError> {
            let hash = service.dummy_hash()?;
            service.verify(password.expose_secret(), hash);
            Ok(())
        })
        .await
        .map_err(|e| HashingError(format!("task join error: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn fast() -> PasswordService {
        PasswordService::with_cost(4)
    }

    #[test]
    fn test_default_cost_is_twelve() {
        assert_eq!(PasswordService::default().cost(), 12);
    }

    #[test]
    fn test_hash_and_verify() {
        let service = fast();
        let hash = service.hash("secure_password_123").unwrap();

        assert!(service.verify("secure_password_123", &hash));
        assert!(!service.verify("wrong_password", &hash));
    }

    #[test]
    fn test_different_hashes_for_same_password() {
        let service = fast();
        let hash1 = service.hash("test_password").unwrap();
        let hash2 = service.hash("test_password").unwrap();

        // Random salt
        assert_ne!(hash1, hash2);
        assert!(service.verify("test_password", &hash1));
        assert!(service.verify("test_password", &hash2));
    }

    #[test]
    fn test_hash_records_cost() {
        let hash = PasswordService::default().hash("pw").unwrap();
        assert!(hash.starts_with("$2b$12$"));
    }

    #[test]
    fn test_malformed_hash_is_false_not_error() {
        let service = fast();
        assert!(!service.verify("anything", ""));
        assert!(!service.verify("anything", "not-a-bcrypt-hash"));
        assert!(!service.verify("anything", "$2b$12$tooshort"));
    }

    #[tokio::test]
    async fn test_async_hash_and_verify() {
        let service = fast();
        let hash = service
            .hash_async(SecretString::new("async_test_password".to_string()))
            .await
            .unwrap();

        assert!(service
            .verify_async(SecretString::new("async_test_password".to_string()), hash.clone())
            .await
            .unwrap());
        assert!(!service
            .verify_async(SecretString::new("wrong".to_string()), hash)
            .await
            .unwrap());
    }

    #[test]
    fn test_passwords_past_72_bytes_are_not_truncated() {
        let service = fast();
        let prefix = "a".repeat(72);
        let one = format!("{}ONE", prefix);
        let two = format!("{}TWO", prefix);

        assert!(service.hash(&one).is_err());

        let hash = service.hash(&prefix).unwrap();
        assert!(service.verify(&prefix, &hash));
        assert!(!service.verify(&one, &hash));
        assert!(!service.verify(&two, &hash));
    }

    #[test]
    fn test_dummy_hash_matches_cost_and_is_cached() {
        let service = fast();
        let first = service.dummy_hash().unwrap();
        let second = service.dummy_hash().unwrap();

        assert!(first.starts_with("$2b$04$"));
        assert!(std::ptr::eq(first, second));
        assert!(service.verify(DUMMY_PASSWORD, first));
    }

    #[test]
    fn test_dummy_hash_rejects_out_of_range_cost() {
        assert!(PasswordService::with_cost(40).dummy_hash().is_err());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn prop_hash_verifies_only_original(
            password in "[ -~]{1,40}",
            other in "[ -~]{1,80}",
        ) {
            let service = fast();
            let hash = service.hash(&password).unwrap();

            prop_assert!(service.verify(&password, &hash));
            if other != password {
                prop_assert!(!service.verify(&other, &hash));
            }
        }
    }
}
