//! Helpers for router tests
//!
//! Builds an app over the in-memory store with a fast password hasher and
//! one seeded user (`a@x.com` / `correctpw`).

use crate::auth::PasswordService;
use crate::config::AppConfig;
use crate::repositories::{InMemoryUserStore, NewUser, UserStore};
use crate::routes::create_router;
use crate::state::AppState;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "router-test-secret";
pub const SEEDED_EMAIL: &str = "a@x.com";
pub const SEEDED_PASSWORD: &str = "correctpw";

pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    pub store: Arc<InMemoryUserStore>,
    pub seeded_id: i64,
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.jwt.secret = TEST_SECRET.to_string();
    config
}

impl TestApp {
    pub async fn new() -> Self {
        let passwords = PasswordService::with_cost(4);
        let store = Arc::new(InMemoryUserStore::new());
        let seeded = store
            .insert(NewUser {
                first_name: "Alice".to_string(),
                last_name: "Example".to_string(),
                email: SEEDED_EMAIL.to_string(),
                password_hash: passwords.hash(SEEDED_PASSWORD).unwrap(),
                is_admin: true,
            })
            .await
            .unwrap();

        let state = AppState::new(store.clone(), test_config())
            .unwrap()
            .with_passwords(passwords);
        let app = create_router(state.clone());

        Self {
            app,
            state,
            store,
            seeded_id: seeded.id,
        }
    }

    /// Send a request and return status plus parsed JSON body
    ///
    /// Non-JSON bodies come back as `Value::Null`.
    pub async fn send(
        &self,
        method: &str,
        path: &str,
        token: Option<&str>,
        body: Option<String>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = match body {
            Some(body) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(body)
            }
            None => Body::empty(),
        };

        let response = self
            .app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    pub async fn login(&self, email: &str, password: &str) -> (StatusCode, Value) {
        let body = serde_json::json!({ "email": email, "password": password });
        self.send("POST", "/api/v1/auth/login", None, Some(body.to_string()))
            .await
    }

    /// Log in as the seeded user and return the token
    pub async fn seeded_token(&self) -> String {
        let (status, body) = self.login(SEEDED_EMAIL, SEEDED_PASSWORD).await;
        assert_eq!(status, StatusCode::OK, "seeded login failed: {}", body);
        body["token"].as_str().unwrap().to_string()
    }
}
