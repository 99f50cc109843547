//! Authentication Models
//!
//! Data structures for authentication requests, responses, and the per-request
//! identity.

use serde::{Deserialize, Serialize};

/// Identity resolved from a verified bearer token. Lives for one request.
#[derive(Debug, Clone)]
pub struct RequestIdentity {
    /// The subject (email) bound to the token
    pub email: String,
    /// Token expiration timestamp
    pub expires_at: i64,
}

/// Login request payload
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Registration request payload
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub surname: String,
    #[serde(default)]
    pub age: i32,
}

/// Token response after successful authentication
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
    pub token_type: String,
    pub expires_at: i64,
}

impl TokenResponse {
    pub fn new(token: String, expires_at: i64) -> Self {
        Self {
            token,
            token_type: "Bearer".to_string(),
            expires_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub user_id: i32,
    pub reply: String,
}

#[derive(Debug, Deserialize)]
pub struct ProtectedRequest {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProtectedReply {
    pub result: String,
}
