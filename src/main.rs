//! # Bike Rental Server
//!
//! HTTP backend for a bike rental service: bikes, rentals and user
//! authentication, built with Axum and Tokio.
//!
//! ## Architecture
//! - `server`: router assembly and the serve loop
//! - `config`: environment variable configuration
//! - `auth`: JWT session tokens, password hashing, login/registration,
//!   identity resolution and the ownership guard
//! - `database`: store traits with Postgres and in-memory implementations
//! - `routes`: HTTP handlers for auth, bikes, rentals and health
//!
//! ## Running the Server
//! ```bash
//! JWT_SECRET=change-me cargo run
//! ```
//!
//! Without `DATABASE_URL` the server keeps all data in memory.

mod auth;
mod config;
mod database;
mod error;
mod routes;
mod server;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; the environment may already be populated.
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .compact(),
        )
        .init();

    tracing::info!("🏁 Starting bike rental server...");
    tracing::info!("📦 Package: {} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    let config = config::Config::from_env()?;
    server::start(config).await
}
