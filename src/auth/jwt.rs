//! JWT Token Service
//!
//! Issues and verifies the signed session tokens that bind a subject (the
//! user's email) to an issuance time and an expiry.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::JwtConfig;
use crate::error::AuthError;

/// JWT Claims structure carried by every session token
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject: the user's email
    pub sub: String,
    /// Token issued at timestamp
    pub iat: i64,
    /// Token expiration timestamp
    pub exp: i64,
    /// Token issuer
    pub iss: String,
    /// Unique token id
    pub jti: String,
}

/// Signed token handed to the client after login
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: i64,
}

struct SigningKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

/// JWT Service for token operations. Stateless; share it behind an `Arc`.
pub struct JwtService {
    keys: Option<SigningKeys>,
    validation: Validation,
    issuer: String,
    ttl: Duration,
}

impl JwtService {
    /// Create a new JWT service. A missing secret yields a service that
    /// refuses to issue and rejects every token.
    pub fn new(secret: Option<&str>, issuer: &str, ttl: std::time::Duration) -> Self {
        let keys = secret.filter(|s| !s.is_empty()).map(|secret| SigningKeys {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        });

        let mut validation = Validation::default();
        validation.set_issuer(&[issuer]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        validation.leeway = 0;

        Self {
            keys,
            validation,
            issuer: issuer.to_string(),
            ttl: Duration::from_std(ttl).unwrap_or_else(|_| Duration::hours(24)),
        }
    }

    pub fn from_config(config: &JwtConfig) -> Self {
        Self::new(config.secret.as_deref(), &config.issuer, config.ttl)
    }

    /// Issue a token binding `subject`
    pub fn issue(&self, subject: &str) -> Result<IssuedToken, AuthError> {
        let keys = self
            .keys
            .as_ref()
            .ok_or_else(|| AuthError::Signing("signing key unavailable".to_string()))?;

        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AuthError::Signing("token lifetime out of range".to_string()))?;
        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            iss: self.issuer.clone(),
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::default(), &claims, &keys.encoding)
            .map_err(|e| AuthError::Signing(e.to_string()))?;

        Ok(IssuedToken {
            token,
            expires_at: claims.exp,
        })
    }

    /// Validate signature, issuer and expiry, returning the claims
    pub fn verify_claims(&self, token: &str) -> Result<Claims, AuthError> {
        let keys = self.keys.as_ref().ok_or(AuthError::InvalidToken)?;
        decode::<Claims>(token, &keys.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("Token rejected: {}", e);
                AuthError::InvalidToken
            })
    }

    /// Validate a token and return its subject
    pub fn verify(&self, token: &str) -> Result<String, AuthError> {
        self.verify_claims(token).map(|claims| claims.sub)
    }
}
