//! Authentication middleware
//!
//! The access gate for protected routes. [`authorize`] does the work:
//!
//! 1. take the bearer token from the `Authorization` header
//! 2. verify it with the [`TokenCodec`]
//! 3. confirm the user still exists in the directory
//!
//! [`require_auth`] applies it to a whole router as a layer and stores the
//! resulting [`Identity`] in request extensions. [`AuthUser`] reads it back
//! in handlers.

use super::error::AuthError;
use super::jwt::TokenCodec;
use crate::error::ApiError;
use crate::repositories::UserDirectory;
use crate::state::AppState;
use axum::{
    extract::{FromRef, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::debug;
use user_service_shared::Identity;

/// Expected scheme prefix of the `Authorization` header
pub const BEARER_PREFIX: &str = "Bearer ";

/// Extract the bearer token from request headers
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidScheme)?;

    header
        .strip_prefix(BEARER_PREFIX)
        .ok_or(AuthError::InvalidScheme)
}

/// Resolve the caller's identity or reject the request
///
/// Never mutates anything, so it can sit in front of any number of routes.
pub async fn authorize<D>(
    headers: &HeaderMap,
    codec: &TokenCodec,
    directory: &D,
) -> Result<Identity, AuthError>
where
    D: UserDirectory + ?Sized,
{
    let token = bearer_token(headers)?;
    let claims = codec.verify(token)?;

    // Deleted accounts are rejected here even though their tokens still verify
    let exists = directory
        .exists(claims.id)
        .await
        .map_err(AuthError::Directory)?;
    if !exists {
        return Err(AuthError::UserGone);
    }

    debug!(user_id = claims.id, "Request authorized");
    Ok(claims.identity())
}

/// Authenticated caller
///
/// Uses the identity stored by [`require_auth`] when the route sits behind
/// the layer, and runs [`authorize`] itself otherwise.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Identity);

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(identity) = parts.extensions.get::<Identity>() {
            return Ok(AuthUser(identity.clone()));
        }

        let app_state = AppState::from_ref(state);
        let identity = authorize(&parts.headers, app_state.tokens(), app_state.users()).await?;
        Ok(AuthUser(identity))
    }
}

/// Layer function for a group of protected routes
///
/// Use with `axum::middleware::from_fn_with_state` as a `route_layer`.
/// The wrapped handler's response passes through unchanged.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let identity = authorize(request.headers(), state.tokens(), state.users()).await?;
    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}
