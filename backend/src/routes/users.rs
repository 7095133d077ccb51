//! User management routes
//!
//! Every route here sits behind the access gate.

use super::extract::{ApiJson, ApiPath};
use crate::auth::{require_auth, AuthUser};
use crate::error::ApiResult;
use crate::services::UserService;
use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    routing::get,
    Json, Router,
};
use tracing::info;
use user_service_shared::{CreateUserRequest, DeletedResponse, UpdateUserRequest, User};

/// Create user routes
pub fn user_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}

/// POST /api/v1/users
async fn create_user(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    ApiJson(req): ApiJson<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let user = UserService::create(state.users(), state.passwords(), req).await?;
    info!(created_by = caller.id, user_id = user.id, "User created via API");
    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /api/v1/users
async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<User>>> {
    Ok(Json(UserService::list(state.users()).await?))
}

/// GET /api/v1/users/:id
async fn get_user(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<User>> {
    Ok(Json(UserService::get(state.users(), id).await?))
}

/// PUT /api/v1/users/:id
async fn update_user(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<UpdateUserRequest>,
) -> ApiResult<Json<User>> {
    Ok(Json(UserService::update(state.users(), id, req).await?))
}

/// DELETE /api/v1/users/:id
async fn delete_user(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<DeletedResponse>> {
    let deleted = UserService::delete(state.users(), id).await?;
    info!(deleted_by = caller.id, user_id = deleted, "User deleted via API");
    Ok(Json(DeletedResponse { deleted }))
}
