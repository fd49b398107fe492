//! HTTP interface - axum router over the core services.
//!
//! - `routes/`: handlers, one file per area
//! - `extract.rs`: the account id extractor
//! - `errors.rs`: mapping of crate errors to JSON responses

use crate::{config::Settings, errors::Result};
use axum::Router;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Error responses
pub mod errors;
/// Request extractors
pub mod extract;
/// Route handlers
pub mod routes;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: DatabaseConnection,
    /// Loaded application settings
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Wraps a connection and settings for sharing across handlers.
    #[must_use]
    pub fn new(db: DatabaseConnection, settings: Settings) -> Self {
        Self {
            db,
            settings: Arc::new(settings),
        }
    }
}

/// Builds the full HTTP router.
pub fn router(state: AppState) -> Router {
    routes::router()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds `settings.server.bind` and serves until Ctrl+C.
///
/// # Errors
/// Returns an error if the address cannot be bound or the server fails.
pub async fn serve(db: DatabaseConnection, settings: Settings) -> Result<()> {
    let bind = settings.server.bind.clone();
    let app = router(AppState::new(db, settings));

    let listener = tokio::net::TcpListener::bind(&bind).await?;
    info!("Listening on {}", bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
