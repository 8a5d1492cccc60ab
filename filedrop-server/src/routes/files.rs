//! Stored file listing

use axum::{extract::State, routing::get, Json, Router};
use tracing::instrument;

use crate::error::ApiError;
use crate::state::AppState;

/// GET /files - names in the upload directory, unsorted
#[instrument(skip_all)]
async fn list_files(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    let names = state
        .uploads()
        .list()
        .await
        .map_err(ApiError::DirectoryRead)?;

    tracing::debug!(count = names.len(), "listed upload directory");
    Ok(Json(names))
}

/// Listing routes
pub fn router() -> Router<AppState> {
    Router::new().route("/files", get(list_files))
}
