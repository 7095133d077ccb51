//! In-memory user store
//!
//! Selected with `store.backend = "memory"`. Nothing survives a restart.
//! Also what the router tests run against.

use super::{NewUser, StoredCredential, UpdateUser, UserDirectory, UserRecord, UserStore};
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Inner {
    next_id: i64,
    users: BTreeMap<i64, UserRecord>,
}

/// User store holding records in a map keyed by id
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    inner: RwLock<Inner>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<StoredCredential>> {
        let inner = self.inner.read().await;
        Ok(inner
            .users
            .values()
            .find(|user| user.email == email)
            .map(UserRecord::credential))
    }

    async fn exists(&self, id: i64) -> Result<bool> {
        Ok(self.inner.read().await.users.contains_key(&id))
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn insert(&self, user: NewUser) -> Result<UserRecord> {
        let mut inner = self.inner.write().await;
        if inner.users.values().any(|existing| existing.email == user.email) {
            anyhow::bail!("duplicate key value violates unique constraint on email");
        }

        // Ids start at 1 and are never reused, like a serial column
        inner.next_id += 1;
        let record = UserRecord {
            id: inner.next_id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            password_hash: user.password_hash,
            is_admin: user.is_admin,
            created_at: Utc::now(),
        };
        inner.users.insert(record.id, record.clone());
        Ok(record)
    }

    async fn list(&self) -> Result<Vec<UserRecord>> {
        Ok(self.inner.read().await.users.values().cloned().collect())
    }

    async fn get(&self, id: i64) -> Result<Option<UserRecord>> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn update(&self, id: i64, updates: UpdateUser) -> Result<Option<UserRecord>> {
        let mut inner = self.inner.write().await;
        let Some(record) = inner.users.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(first_name) = updates.first_name {
            record.first_name = first_name;
        }
        if let Some(last_name) = updates.last_name {
            record.last_name = last_name;
        }
        if let Some(email) = updates.email {
            record.email = email;
        }
        Ok(Some(record.clone()))
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        Ok(self.inner.write().await.users.remove(&id).is_some())
    }

    async fn email_exists(&self, email: &str) -> Result<bool> {
        Ok(self.find_by_email(email).await?.is_some())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
