//! User Service Shared Library
//!
//! Wire types, error bodies and validation helpers shared between the
//! backend and its clients.

pub mod errors;
pub mod models;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use errors::{ErrorCode, ErrorResponse, FieldErrors};
pub use models::{Identity, User};
pub use types::*;
