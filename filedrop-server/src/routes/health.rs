//! Health check endpoint

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// Number of stored files, absent when the upload directory is unreadable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stored_files: Option<usize>,
}

/// GET /health
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let stored_files = state.uploads().list().await.ok().map(|names| names.len());

    Json(HealthResponse {
        status: if stored_files.is_some() { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        stored_files,
    })
}

/// Health routes
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
