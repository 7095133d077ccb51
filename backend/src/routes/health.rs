//! Health check endpoints
//!
//! - /health - Basic health check
//! - /health/ready - Readiness probe (pings the user store)
//! - /health/live - Liveness probe

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

/// Reported in place of the underlying store error
pub const STORE_UNAVAILABLE: &str = "user store unavailable";

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<HealthChecks>,
}

impl HealthResponse {
    fn new(status: &'static str) -> Self {
        Self {
            status,
            version: env!("CARGO_PKG_VERSION"),
            checks: None,
        }
    }
}

/// Individual health checks
#[derive(Debug, Serialize)]
pub struct HealthChecks {
    pub store: CheckStatus,
}

/// Status of an individual check
#[derive(Debug, Serialize)]
pub struct CheckStatus {
    pub healthy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Basic health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::new("healthy"))
}

/// Readiness probe
///
/// 503 while the user store is unreachable.
pub async fn readiness_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<HealthResponse>) {
    let store = match state.users().ping().await {
        Ok(()) => CheckStatus {
            healthy: true,
            message: None,
        },
        Err(e) => {
            tracing::warn!(error = ?e, "User store is not ready");
            CheckStatus {
                healthy: false,
                message: Some(STORE_UNAVAILABLE.to_string()),
            }
        }
    };

    let (status, label) = if store.healthy {
        (StatusCode::OK, "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "not_ready")
    };
    let mut response = HealthResponse::new(label);
    response.checks = Some(HealthChecks { store });

    (status, Json(response))
}

/// Liveness probe
pub async fn liveness_check() -> Json<HealthResponse> {
    Json(HealthResponse::new("alive"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::repositories::{
        InMemoryUserStore, NewUser, StoredCredential, UpdateUser, UserDirectory, UserRecord,
        UserStore,
    };
    use async_trait::async_trait;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_health_check_returns_healthy() {
        let response = health_check().await;
        assert_eq!(response.status, "healthy");
        assert!(!response.version.is_empty());
    }

    #[tokio::test]
    async fn test_liveness_check_returns_alive() {
        let response = liveness_check().await;
        assert_eq!(response.status, "alive");
    }

    struct UnreachableStore;

    #[async_trait]
    impl UserDirectory for UnreachableStore {
        async fn find_by_email(&self, _email: &str) -> anyhow::Result<Option<StoredCredential>> {
            anyhow::bail!("connection refused: db.internal:5432")
        }

        async fn exists(&self, _id: i64) -> anyhow::Result<bool> {
            anyhow::bail!("connection refused: db.internal:5432")
        }
    }

    #[async_trait]
    impl UserStore for UnreachableStore {
        async fn insert(&self, _user: NewUser) -> anyhow::Result<UserRecord> {
            anyhow::bail!("connection refused: db.internal:5432")
        }

        async fn list(&self) -> anyhow::Result<Vec<UserRecord>> {
            anyhow::bail!("connection refused: db.internal:5432")
        }

        async fn get(&self, _id: i64) -> anyhow::Result<Option<UserRecord>> {
            anyhow::bail!("connection refused: db.internal:5432")
        }

        async fn update(
            &self,
            _id: i64,
            _updates: UpdateUser,
        ) -> anyhow::Result<Option<UserRecord>> {
            anyhow::bail!("connection refused: db.internal:5432")
        }

        async fn delete(&self, _id: i64) -> anyhow::Result<bool> {
            anyhow::bail!("connection refused: db.internal:5432")
        }

        async fn email_exists(&self, _email: &str) -> anyhow::Result<bool> {
            anyhow::bail!("connection refused: db.internal:5432")
        }

        async fn ping(&self) -> anyhow::Result<()> {
            anyhow::bail!("connection refused: db.internal:5432")
        }
    }

    #[tokio::test]
    async fn test_readiness_hides_store_error() {
        let mut config = AppConfig::default();
        config.jwt.secret = "health-test-secret".to_string();
        let state = AppState::new(Arc::new(UnreachableStore), config).unwrap();

        let (status, response) = readiness_check(State(state)).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(response.status, "not_ready");

        let store = &response.checks.as_ref().unwrap().store;
        assert!(!store.healthy);
        assert_eq!(store.message.as_deref(), Some(STORE_UNAVAILABLE));

        let body = serde_json::to_string(&response.0).unwrap();
        assert!(!body.contains("db.internal"));
    }

    #[tokio::test]
    async fn test_readiness_with_memory_store() {
        let mut config = AppConfig::default();
        config.jwt.secret = "health-test-secret".to_string();
        let state = AppState::new(Arc::new(InMemoryUserStore::new()), config).unwrap();

        let (status, response) = readiness_check(State(state)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(response.status, "ready");
        assert!(response.checks.as_ref().unwrap().store.healthy);
    }
}
