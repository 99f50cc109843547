//! Configuration module for environment variables and application settings

use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    /// Token signing configuration
    pub jwt: JwtConfig,

    /// Postgres URL; the in-memory store is used when unset
    pub database_url: Option<String>,

    /// Server configuration
    pub server: ServerConfig,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC secret. `None` leaves the token service without a signing key.
    pub secret: Option<String>,
    pub issuer: String,
    pub ttl: Duration,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let port = env::var("SERVER_PORT")
            .or_else(|_| env::var("PORT"))
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .context("SERVER_PORT must be a valid port number")?;

        Ok(Self {
            jwt: JwtConfig {
                secret: env::var("JWT_SECRET").ok().filter(|s| !s.is_empty()),
                issuer: env::var("JWT_ISSUER")
                    .unwrap_or_else(|_| "bike-rental-server".to_string()),
                ttl: Duration::from_secs(parse_or("JWT_TTL_SECONDS", 24 * 60 * 60)),
            },

            database_url: env::var("DATABASE_URL").ok().filter(|s| !s.is_empty()),

            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port,
                request_timeout: Duration::from_secs(parse_or("REQUEST_TIMEOUT_SECONDS", 30)),
            },
        })
    }
}

fn parse_or(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
