//! Static fallback for every path without a dedicated route

use axum::{
    extract::State,
    http::{Method, Uri},
    response::Response,
};
use tracing::instrument;

use crate::error::ApiError;
use crate::state::AppState;

/// GET/HEAD <any> - file lookup under the public root
#[instrument(skip(state), fields(path = %uri.path()))]
pub async fn serve_asset(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
) -> Result<Response, ApiError> {
    if method != Method::GET && method != Method::HEAD {
        return Err(ApiError::MethodNotAllowed);
    }

    state.public().serve(uri.path()).await
}
