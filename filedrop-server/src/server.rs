//! Axum server setup
//!
//! Startup order: create the upload directory, build the router, bind,
//! then serve until Ctrl+C or SIGTERM.

use std::net::SocketAddr;
use std::time::Duration;

use axum::{http::StatusCode, Router};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::assets::PublicRoot;
use crate::config::ServerConfig;
use crate::routes;
use crate::state::AppState;
use crate::store::UploadStore;

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("failed to prepare upload directory {path}: {source}")]
    UploadDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Build the application router with all routes
pub fn build_router(state: AppState, request_timeout: Duration) -> Router {
    let middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ));

    Router::new()
        .merge(routes::health::router())
        .merge(routes::upload::router())
        .merge(routes::files::router())
        .fallback(routes::assets::serve_asset)
        .layer(middleware)
        .with_state(state)
}

/// Run the HTTP server until a shutdown signal arrives
pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let uploads = UploadStore::open(&config.upload_dir)
        .await
        .map_err(|source| ServerError::UploadDir {
            path: config.upload_dir.display().to_string(),
            source,
        })?;

    let public = PublicRoot::new(&config.public_dir);
    if !public.root().is_dir() {
        tracing::warn!(
            public_dir = %public.root().display(),
            "public directory missing, static requests will 404"
        );
    }

    let state = AppState::new(uploads, public, config.max_upload_bytes);
    let app = build_router(state, config.request_timeout);

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: config.bind_addr,
            source,
        })?;
    tracing::info!("Server running on port {}", config.bind_addr.port());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Ctrl+C handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}
