//! Error Types
//!
//! Domain errors for authentication and storage, plus the HTTP mapping used by
//! every route handler.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;

/// Failures of the authentication and session-identity core.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown email and wrong password share this variant and its message.
    #[error("incorrect email or password")]
    Authentication,

    #[error("registration failed: {0}")]
    Registration(String),

    #[error("invalid token")]
    InvalidToken,

    #[error("missing identity")]
    MissingIdentity,

    #[error("not authorized: {0}")]
    Authorization(String),

    #[error("could not sign token: {0}")]
    Signing(String),
}

/// Failures reported by a store implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,

    #[error("record already exists")]
    Duplicate,

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

impl From<tokio_postgres::Error> for StoreError {
    fn from(err: tokio_postgres::Error) -> Self {
        if err.code() == Some(&tokio_postgres::error::SqlState::UNIQUE_VIOLATION) {
            return StoreError::Duplicate;
        }
        StoreError::Backend(anyhow::Error::new(err))
    }
}

impl From<deadpool_postgres::PoolError> for StoreError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        StoreError::Backend(anyhow::Error::new(err).context("Failed to get DB connection"))
    }
}

/// Error returned by HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// The request body was missing, not JSON, or did not match the payload type
    #[error("invalid request body: {0}")]
    InvalidBody(#[from] JsonRejection),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Auth(AuthError::Authentication)
            | ApiError::Auth(AuthError::InvalidToken)
            | ApiError::Auth(AuthError::MissingIdentity) => StatusCode::UNAUTHORIZED,
            ApiError::Auth(AuthError::Authorization(_)) => StatusCode::FORBIDDEN,
            ApiError::Auth(AuthError::Registration(_)) => StatusCode::BAD_REQUEST,
            ApiError::Auth(AuthError::Signing(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Store(StoreError::NotFound) => StatusCode::NOT_FOUND,
            ApiError::Store(StoreError::Duplicate) => StatusCode::CONFLICT,
            ApiError::Store(StoreError::Backend(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::InvalidBody(rejection) => rejection.status(),
        }
    }

    /// Message safe to return to the caller.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Auth(AuthError::Signing(_)) => "could not generate token".to_string(),
            ApiError::Store(StoreError::Backend(_)) => "internal storage error".to_string(),
            ApiError::InvalidBody(rejection) => rejection.body_text(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {:#}", self);
        }
        (status, Json(json!({ "error": self.user_message() }))).into_response()
    }
}
