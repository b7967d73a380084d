//! Web UI: upload an image, get its persistence summary.
//!
//! ```text
//! /
//! ├── GET  /                        - upload form
//! ├── POST /                        - store upload, redirect to its result
//! ├── GET  /result/{filename}       - result page (image, charts, tables)
//! └── GET  /api/result/{filename}   - same analysis as JSON
//! ```

pub mod handlers;
pub mod views;

use std::path::Path;
use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::error::Result;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self { config: Arc::new(config) }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn upload_dir(&self) -> &Path {
        &self.config.upload_dir
    }
}

/// Build the router with all routes
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config().max_upload_bytes;

    Router::new()
        .route("/", get(handlers::index).post(handlers::upload))
        .route("/result/{filename}", get(handlers::result))
        .route("/api/result/{filename}", get(handlers::api_result))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Validate config, create the upload directory, bind and serve until shutdown
pub async fn serve(config: ServerConfig) -> Result<()> {
    config.validate()?;
    tokio::fs::create_dir_all(&config.upload_dir).await?;

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    tracing::info!(
        addr = %listener.local_addr()?,
        upload_dir = %config.upload_dir.display(),
        "serving web UI"
    );

    let router = build_router(AppState::new(config));
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
