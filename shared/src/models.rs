//! Data models for the User Service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Resolved identity of an authenticated caller
///
/// Derived from a verified token on every request and discarded when the
/// request completes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Identity {
    pub id: i64,
    pub email: String,
}

/// User account as exposed over the API
///
/// The password hash never leaves the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}
