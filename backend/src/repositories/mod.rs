//! User storage
//!
//! [`UserDirectory`] is the read-only lookup the auth subsystem depends on.
//! [`UserStore`] adds the CRUD operations used by the user endpoints.
//! Both are implemented for Postgres and for an in-memory map.

pub mod memory;
pub mod user;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use user_service_shared::User;

pub use memory::InMemoryUserStore;
pub use user::PgUserStore;

/// What the authenticator needs to check a password
#[derive(Debug, Clone)]
pub struct StoredCredential {
    pub user_id: i64,
    pub email: String,
    pub password_hash: String,
}

/// User record from storage
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    pub fn credential(&self) -> StoredCredential {
        StoredCredential {
            user_id: self.id,
            email: self.email.clone(),
            password_hash: self.password_hash.clone(),
        }
    }
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        User {
            id: record.id,
            first_name: record.first_name,
            last_name: record.last_name,
            email: record.email,
            is_admin: record.is_admin,
            created_at: record.created_at,
        }
    }
}

/// Input for creating a user; the password is already hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub is_admin: bool,
}

/// Input for updating a user
///
/// `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

/// Lookups consumed by the authenticator and the access gate
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Stored credential for `email`, if any user has it
    async fn find_by_email(&self, email: &str) -> Result<Option<StoredCredential>>;

    /// Whether a user with `id` still exists
    async fn exists(&self, id: i64) -> Result<bool>;
}

/// Full user storage
#[async_trait]
pub trait UserStore: UserDirectory {
    async fn insert(&self, user: NewUser) -> Result<UserRecord>;

    async fn list(&self) -> Result<Vec<UserRecord>>;

    async fn get(&self, id: i64) -> Result<Option<UserRecord>>;

    /// Apply `updates`; `None` when no user has `id`
    async fn update(&self, id: i64, updates: UpdateUser) -> Result<Option<UserRecord>>;

    /// Remove a user; `false` when no user has `id`
    async fn delete(&self, id: i64) -> Result<bool>;

    async fn email_exists(&self, email: &str) -> Result<bool>;

    /// Check the backing storage is reachable
    async fn ping(&self) -> Result<()>;
}
