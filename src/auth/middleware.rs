//! Authentication Middleware
//!
//! Resolves the caller's identity from request metadata. The identity is always
//! derived by verifying the raw bearer token; nothing else in the request is
//! trusted to carry it.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::auth::{jwt::JwtService, models::RequestIdentity};
use crate::error::{ApiError, AuthError};

/// Pull the token out of the `authorization` header.
///
/// Accepts `Bearer <token>` (any case of the scheme) and a bare `<token>`.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?.trim();
    // The auth scheme is case-insensitive.
    let token = match value.get(..6) {
        Some(scheme) if scheme.eq_ignore_ascii_case("bearer") && (value.len() == 6 || value[6..].starts_with(' ')) => {
            value[6..].trim()
        }
        _ => value,
    };
    if token.is_empty() { None } else { Some(token) }
}

/// Resolve the subject for a request by verifying its bearer token
pub fn resolve_identity(headers: &HeaderMap, jwt_service: &JwtService) -> Result<RequestIdentity, AuthError> {
    let token = bearer_token(headers).ok_or(AuthError::MissingIdentity)?;
    let claims = jwt_service.verify_claims(token)?;
    Ok(RequestIdentity {
        email: claims.sub,
        expires_at: claims.exp,
    })
}

/// Authentication middleware that verifies bearer tokens and injects the identity
pub struct AuthMiddleware;

impl AuthMiddleware {
    /// Rejects the request unless it carries a valid token
    pub async fn require_identity(
        State(jwt_service): State<Arc<JwtService>>,
        mut req: Request,
        next: Next,
    ) -> Result<Response, ApiError> {
        let identity = resolve_identity(req.headers(), &jwt_service).map_err(|e| {
            tracing::warn!("[AuthMiddleware] {} {} rejected: {}", req.method(), req.uri(), e);
            e
        })?;

        tracing::debug!("[AuthMiddleware] identity resolved for {}", identity.email);

        // Overwrites anything already present, so only verified identities reach handlers.
        req.extensions_mut().insert(identity);

        Ok(next.run(req).await)
    }
}

impl<S: Send + Sync> FromRequestParts<S> for RequestIdentity {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestIdentity>()
            .cloned()
            .ok_or_else(|| AuthError::MissingIdentity.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn service() -> JwtService {
        JwtService::new(Some("test_secret"), "bike-rental-server", std::time::Duration::from_secs(60))
    }

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_and_raw_tokens_accepted() {
        let jwt_service = service();
        let token = jwt_service.issue("user@example.com").unwrap().token;

        for value in [format!("Bearer {}", token), token.clone()] {
            let identity = resolve_identity(&headers_with(&value), &jwt_service).unwrap();
            assert_eq!(identity.email, "user@example.com");
        }
    }

    #[test]
    fn test_bearer_scheme_is_case_insensitive() {
        let jwt_service = service();
        let token = jwt_service.issue("user@example.com").unwrap().token;

        for scheme in ["bearer", "BEARER", "BeArEr"] {
            let identity = resolve_identity(&headers_with(&format!("{} {}", scheme, token)), &jwt_service).unwrap();
            assert_eq!(identity.email, "user@example.com");
        }
    }

    #[test]
    fn test_missing_header_is_missing_identity() {
        let result = resolve_identity(&HeaderMap::new(), &service());
        assert!(matches!(result, Err(AuthError::MissingIdentity)));

        let result = resolve_identity(&headers_with("Bearer "), &service());
        assert!(matches!(result, Err(AuthError::MissingIdentity)));
    }

    #[test]
    fn test_unverified_identity_header_ignored() {
        let mut headers = headers_with("Bearer forged");
        headers.insert("current_user", HeaderValue::from_static("admin@example.com"));
        let result = resolve_identity(&headers, &service());
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }
}
