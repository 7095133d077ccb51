//! Authentication module
//!
//! Provides bcrypt password hashing, HS256 bearer tokens and the access
//! gate for protected routes.

mod error;
mod jwt;
mod middleware;
mod password;

pub use error::{AuthError, ConfigError, TokenError};
pub use jwt::{Claims, TokenCodec, ALGORITHM};
pub use middleware::{authorize, bearer_token, require_auth, AuthUser, BEARER_PREFIX};
pub use password::{HashingError, PasswordService, DEFAULT_COST};
