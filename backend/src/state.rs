//! Application state management
//!
//! This module provides the shared application state that is passed
//! to all request handlers via Axum's state extraction.
//!
//! # Design Principles
//!
//! 1. **Pre-compute expensive resources**: signing keys are derived once
//! 2. **Cheap cloning**: All fields use Arc or are already Clone-cheap
//! 3. **Immutable after creation**: State is read-only during request handling

use crate::auth::{ConfigError, PasswordService, TokenCodec};
use crate::config::AppConfig;
use crate::repositories::UserStore;
use std::sync::Arc;

/// Shared application state
///
/// # Performance
///
/// - `users`: trait object behind Arc, cloning is O(1)
/// - `config`: Wrapped in Arc, cloning is O(1)
/// - `tokens`: Pre-computed keys wrapped in Arc, cloning is O(1)
#[derive(Clone)]
pub struct AppState {
    /// User storage, also the directory the auth subsystem reads
    pub users: Arc<dyn UserStore>,
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Token codec with cached keys
    pub tokens: TokenCodec,
    /// Password hasher
    pub passwords: PasswordService,
}

impl AppState {
    /// Create a new application state
    ///
    /// Fails when the signing secret is missing or the token TTL is not
    /// positive. Call once at startup.
    pub fn new(users: Arc<dyn UserStore>, config: AppConfig) -> Result<Self, ConfigError> {
        let tokens = TokenCodec::new(&config.jwt)?;

        Ok(Self {
            users,
            config: Arc::new(config),
            tokens,
            passwords: PasswordService::default(),
        })
    }

    /// Replace the password hasher
    pub fn with_passwords(mut self, passwords: PasswordService) -> Self {
        self.passwords = passwords;
        self
    }

    /// Get a reference to the user store
    #[inline]
    pub fn users(&self) -> &dyn UserStore {
        self.users.as_ref()
    }

    /// Get a reference to the configuration
    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Get a reference to the token codec
    #[inline]
    pub fn tokens(&self) -> &TokenCodec {
        &self.tokens
    }

    /// Get a reference to the password hasher
    #[inline]
    pub fn passwords(&self) -> &PasswordService {
        &self.passwords
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::InMemoryUserStore;
    use user_service_shared::Identity;

    fn config_with_secret(secret: &str) -> AppConfig {
        let mut config = AppConfig::default();
        config.jwt.secret = secret.to_string();
        config
    }

    #[test]
    fn test_missing_secret_fails_startup() {
        let result = AppState::new(Arc::new(InMemoryUserStore::new()), AppConfig::default());
        assert!(matches!(result, Err(ConfigError::MissingSecret)));
    }

    #[test]
    fn test_state_clone_is_cheap() {
        let state = AppState::new(
            Arc::new(InMemoryUserStore::new()),
            config_with_secret("state-test-secret"),
        )
        .unwrap();

        // Clone should be O(1) - just Arc increments
        let cloned = state.clone();
        assert!(Arc::ptr_eq(&state.config, &cloned.config));
    }

    #[test]
    fn test_token_codec_is_precomputed() {
        let state = AppState::new(
            Arc::new(InMemoryUserStore::new()),
            config_with_secret("state-test-secret"),
        )
        .unwrap();

        let identity = Identity {
            id: 1,
            email: "a@x.com".to_string(),
        };
        let token = state.tokens().issue(&identity, state.tokens().ttl()).unwrap();
        assert!(!token.is_empty());
        assert_eq!(state.passwords().cost(), 12);
    }
}
