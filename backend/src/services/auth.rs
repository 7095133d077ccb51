//! Credential authentication
//!
//! `lookup → verify password → issue token`. Any step can reject. The
//! rejection kind is kept for the audit log and collapsed at the HTTP
//! boundary.

use crate::auth::{AuthError, PasswordService, TokenCodec};
use crate::repositories::UserDirectory;
use secrecy::SecretString;
use tracing::info;
use user_service_shared::Identity;

/// Authentication service
pub struct AuthService;

impl AuthService {
    /// Check `email` and `password` and issue a token on success
    ///
    /// The token lifetime is the codec's configured TTL. An unknown email
    /// still pays for one bcrypt verification.
    ///
    /// # Performance
    /// Password verification is offloaded to blocking thread pool.
    pub async fn authenticate<D>(
        directory: &D,
        passwords: &PasswordService,
        tokens: &TokenCodec,
        email: &str,
        password: SecretString,
    ) -> Result<(Identity, String), AuthError>
    where
        D: UserDirectory + ?Sized,
    {
        let lookup = directory
            .find_by_email(email)
            .await
            .map_err(AuthError::Directory)?;
        let Some(credential) = lookup else {
            // Same bcrypt work as a wrong password
            passwords.verify_dummy_async(password).await?;
            return Err(AuthError::UnknownEmail);
        };

        let valid = passwords
            .verify_async(password, credential.password_hash)
            .await?;
        if !valid {
            return Err(AuthError::InvalidCredentials);
        }

        let identity = Identity {
            id: credential.user_id,
            email: credential.email,
        };
        let token = tokens.issue(&identity, tokens.ttl())?;

        info!(user_id = identity.id, "User authenticated");
        Ok((identity, token))
    }
}
