//! Extractors whose rejections render as [`ApiError`]
//!
//! axum's own `Json` and `Path` reject with plain-text bodies and a mix of
//! 400/415/422. These wrappers give every malformed request the structured
//! 400 body.

use crate::error::ApiError;
use axum::extract::{FromRequest, FromRequestParts};

/// JSON request body
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Path parameters
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);
