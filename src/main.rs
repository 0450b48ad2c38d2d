//! StaffDesk attendance dashboard
//!
//! A server-rendered dashboard with session login, sidebar navigation, and photo-backed
//! activity logging to a CSV file.

mod auth;
mod config;
mod db;
mod errors;
mod models;
mod session;
mod ui;
mod web;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use time::Duration;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use auth::{CredentialVerifier, StaticCredentials};
use config::Config;
use db::ActivityStore;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ActivityStore>,
    pub credentials: Arc<dyn CredentialVerifier>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting StaffDesk");
    tracing::info!("Activity log: {:?}", config.log_path);
    tracing::info!("Photos directory: {:?}", config.photos_dir);
    tracing::info!("Bind address: {}", config.bind_addr);

    if !config.cookie_secure {
        tracing::warn!("Session cookie is not marked Secure (STAFFDESK_COOKIE_SECURE=false)");
    }

    // Initialize activity store
    let store = Arc::new(db::init_store(&config.log_path, &config.photos_dir).await?);
    match store.load().await {
        Ok(records) => tracing::info!(
            "Activity log {:?} holds {} records",
            store.log_path(),
            records.len()
        ),
        Err(e) => tracing::warn!("Activity log is unreadable: {}", e),
    }

    // Create application state
    let state = AppState {
        store,
        credentials: Arc::new(StaticCredentials),
        config: Arc::new(config.clone()),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    let sessions = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(state.config.cookie_secure)
        .with_expiry(Expiry::OnInactivity(Duration::minutes(
            state.config.session_idle_minutes,
        )));

    // Routes that need a logged-in session
    let dashboard_routes = Router::new()
        .route("/navigate", post(web::navigate))
        .route(
            "/activity",
            post(web::submit_activity)
                .layer(DefaultBodyLimit::max(state.config.max_upload_bytes)),
        )
        .nest_service("/photos", ServeDir::new(state.store.photos_dir()))
        .layer(middleware::from_fn(auth::require_login));

    // Public routes
    let public_routes = Router::new()
        .route("/", get(web::index))
        .route("/login", post(web::login))
        .route("/logout", post(web::logout))
        .route("/health", get(health_check));

    Router::new()
        .merge(public_routes)
        .merge(dashboard_routes)
        .layer(sessions)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests;
