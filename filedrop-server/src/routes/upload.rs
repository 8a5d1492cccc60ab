//! Upload endpoint
//!
//! Pipeline: boundary → accumulate body → extract the single file part →
//! validate declared type → name and write to the upload directory.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap},
    routing::post,
    Router,
};
use filedrop_core::{extract_single_file, parse_boundary, validate_content_type};
use tracing::instrument;

use crate::body::accumulate;
use crate::error::ApiError;
use crate::routes::assets::serve_asset;
use crate::state::AppState;

/// POST /upload - store one file from a multipart form post
#[instrument(skip_all)]
async fn upload(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Body,
) -> Result<String, ApiError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    let boundary = parse_boundary(content_type)?;

    let raw = accumulate(body, state.max_upload_bytes()).await?;
    let file = extract_single_file(&raw, &boundary)?;
    let allowed = validate_content_type(&file.content_type)?;

    let stored = state.uploads().save(&file).await?;
    tracing::info!(
        storage_name = %stored.storage_name,
        content_type = %allowed,
        bytes = stored.size,
        "file uploaded"
    );

    Ok(format!("File uploaded successfully: {}", stored.storage_name))
}

/// Upload routes
///
/// Only POST is handled here; any other method on `/upload` goes to the
/// static responder like every other path.
pub fn router() -> Router<AppState> {
    Router::new().route("/upload", post(upload).fallback(serve_asset))
}
