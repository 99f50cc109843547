//! Request extractors shared by the route modules

use axum::extract::FromRequest;

use crate::error::ApiError;

/// `axum::Json` whose rejection is reported as an `ApiError`, so malformed
/// bodies get the same `{"error": ...}` shape as every other failure.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);
