//! Internal authentication error kinds
//!
//! These are deliberately richer than what goes over the wire. Logs get the
//! exact reason a request was rejected; clients get a single 401. See
//! `From<AuthError> for ApiError` for the mapping.

use super::password::HashingError;
use thiserror::Error;

/// Token verification and signing failures
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("token signature or algorithm does not match")]
    InvalidSignature,

    #[error("token could not be parsed")]
    Malformed,

    #[error("token expired")]
    Expired,

    #[error("failed to sign token: {0}")]
    Encoding(String),
}

/// Startup configuration failures for the auth subsystem
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("jwt.secret is not set")]
    MissingSecret,

    #[error("jwt.token_ttl_secs must be positive, got {0}")]
    InvalidTtl(i64),
}

/// Every way authentication or authorization can fail
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("missing authorization header")]
    MissingHeader,

    #[error("authorization header is not a bearer token")]
    InvalidScheme,

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("no user with that email")]
    UnknownEmail,

    #[error("password does not match")]
    InvalidCredentials,

    #[error("token refers to a user that no longer exists")]
    UserGone,

    #[error(transparent)]
    Hashing(#[from] HashingError),

    #[error("user directory lookup failed")]
    Directory(#[source] anyhow::Error),
}

impl AuthError {
    /// Stable identifier for log fields
    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::MissingHeader => "missing_header",
            AuthError::InvalidScheme => "invalid_scheme",
            AuthError::Token(TokenError::InvalidSignature) => "invalid_signature",
            AuthError::Token(TokenError::Malformed) => "malformed_token",
            AuthError::Token(TokenError::Expired) => "expired_token",
            AuthError::Token(TokenError::Encoding(_)) => "token_encoding",
            AuthError::UnknownEmail => "unknown_email",
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::UserGone => "user_gone",
            AuthError::Hashing(_) => "hashing",
            AuthError::Directory(_) => "directory",
        }
    }

    /// True when the failure is ours rather than the caller's
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            AuthError::Hashing(_)
                | AuthError::Directory(_)
                | AuthError::Token(TokenError::Encoding(_))
        )
    }
}
