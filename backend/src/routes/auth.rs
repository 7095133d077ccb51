//! Authentication routes
//!
//! Provides the login endpoint and the current-identity endpoint.
//!
//! # Performance Optimizations
//!
//! - Uses pre-computed signing keys from AppState (no per-request derivation)
//! - Password verification runs on blocking thread pool (doesn't block async runtime)

use super::extract::ApiJson;
use crate::auth::{require_auth, AuthUser};
use crate::error::{ApiError, ApiResult};
use crate::services::AuthService;
use crate::state::AppState;
use axum::{
    extract::State,
    middleware,
    routing::{get, post},
    Json, Router,
};
use user_service_shared::validation::validate_login;
use user_service_shared::{AuthResponse, Identity, LoginRequest};

/// Create auth routes
pub fn auth_routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/me", get(me))
        .route_layer(middleware::from_fn_with_state(state, require_auth));

    Router::new().route("/login", post(login)).merge(protected)
}

/// Login with email and password
///
/// POST /api/v1/auth/login
///
/// An unknown email and a wrong password produce the same 401.
async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let errors = validate_login(&req);
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let (identity, token) = AuthService::authenticate(
        state.users(),
        state.passwords(),
        state.tokens(),
        &req.email,
        req.password,
    )
    .await?;

    Ok(Json(AuthResponse { identity, token }))
}

/// Identity of the caller (requires authentication)
///
/// GET /api/v1/auth/me
async fn me(AuthUser(identity): AuthUser) -> Json<Identity> {
    Json(identity)
}
