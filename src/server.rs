//! # Server Module
//!
//! Application state, router assembly and the HTTP server loop.

use anyhow::{Context, Result};
use axum::{routing::get, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer};

use crate::auth::{AuthGateway, AuthorizationGuard, JwtService};
use crate::config::Config;
use crate::database::{migrations, DatabaseConnection, InMemoryStore, Store};
use crate::routes;
use crate::routes::health::ping;

/// Application state shared across all route handlers
#[derive(Clone)]
pub struct AppState {
    pub jwt_service: Arc<JwtService>,
    pub gateway: Arc<AuthGateway>,
    pub guard: Arc<AuthorizationGuard>,
    pub store: Arc<dyn Store>,
}

impl AppState {
    /// Wire the auth core to a store
    pub fn new<S: Store + 'static>(store: Arc<S>, jwt_service: Arc<JwtService>) -> Result<Self> {
        let gateway = AuthGateway::new(store.clone(), jwt_service.clone())?;
        let guard = AuthorizationGuard::new(store.clone());
        Ok(Self {
            jwt_service,
            gateway: Arc::new(gateway),
            guard: Arc::new(guard),
            store,
        })
    }
}

/// Build the main router with every route and layer attached
pub fn create_router(app_state: AppState, config: &Config) -> Router {
    Router::new()
        .route("/ping", get(ping))
        .merge(routes::auth::create_auth_routes(&app_state))
        .merge(routes::bikes::create_bike_routes(&app_state))
        .merge(routes::rentals::create_rental_routes(&app_state))
        .layer(
            ServiceBuilder::new()
                // Dropping a timed-out request drops its in-flight store calls.
                .layer(TimeoutLayer::new(config.server.request_timeout))
                .layer(
                    CorsLayer::new()
                        .allow_origin(tower_http::cors::Any)
                        .allow_methods([
                            axum::http::Method::GET,
                            axum::http::Method::POST,
                            axum::http::Method::PUT,
                            axum::http::Method::DELETE,
                            axum::http::Method::OPTIONS,
                        ])
                        .allow_headers([
                            axum::http::header::ORIGIN,
                            axum::http::header::CONTENT_TYPE,
                            axum::http::header::ACCEPT,
                            axum::http::header::AUTHORIZATION,
                        ]),
                ),
        )
        .with_state(app_state)
}

/// Open the configured store: Postgres when `DATABASE_URL` is set, memory otherwise
async fn build_state(config: &Config) -> Result<AppState> {
    let jwt_service = Arc::new(JwtService::from_config(&config.jwt));
    if config.jwt.secret.is_none() {
        tracing::warn!("⚠️  JWT_SECRET is not set; logins will fail until a signing key is configured");
    }

    match &config.database_url {
        Some(url) => {
            let db = DatabaseConnection::from_url(url).await?;
            migrations::run_migrations(db.pool()).await?;
            AppState::new(Arc::new(db), jwt_service)
        }
        None => {
            tracing::warn!("⚠️  DATABASE_URL is not set; using the in-memory store");
            AppState::new(Arc::new(InMemoryStore::new()), jwt_service)
        }
    }
}

/// Starts the bike rental HTTP server and runs until Ctrl+C.
pub async fn start(config: Config) -> Result<()> {
    let app_state = build_state(&config).await?;
    let app = create_router(app_state, &config);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {} - port may already be in use", addr))?;

    tracing::info!("🚀 Bike rental server starting...");
    tracing::info!("📡 Listening on http://{}", addr);
    tracing::info!("🏥 Health check available at http://{}/ping", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("👋 Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
