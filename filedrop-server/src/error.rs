//! API error types with IntoResponse
//!
//! Upload failures answer in plain text, the listing answers in JSON and
//! static lookups answer in HTML or plain text, matching what each route's
//! clients expect.

use std::io;

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use filedrop_core::{MultipartError, UploadError};
use serde_json::json;

pub const INVALID_UPLOAD: &str = "Invalid file upload.";
pub const INVALID_TYPE: &str = "Invalid file type. Only JPG, PNG, and PDF are allowed.";
pub const TOO_LARGE: &str = "File too large.";
pub const SAVE_FAILED: &str = "Server error while saving the file.";
pub const NOT_FOUND_PAGE: &str = "<h1>404 - File Not Found</h1>";

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Upload pipeline failure (400/413/500, plain text)
    Upload(UploadError),

    /// Upload directory could not be listed (500, JSON)
    DirectoryRead(UploadError),

    /// Static file missing (404, HTML)
    AssetNotFound,

    /// Static file exists but could not be read (500, plain text)
    AssetRead(io::Error),

    /// Method not served by the static fallback (405)
    MethodNotAllowed,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Upload(err) => {
                let (status, message) = match &err {
                    UploadError::Malformed(_) | UploadError::InvalidFilename { .. } => {
                        (StatusCode::BAD_REQUEST, INVALID_UPLOAD)
                    }
                    UploadError::Validation { .. } => (StatusCode::BAD_REQUEST, INVALID_TYPE),
                    UploadError::PayloadTooLarge { .. } => {
                        (StatusCode::PAYLOAD_TOO_LARGE, TOO_LARGE)
                    }
                    // The client is usually gone; the response is best effort.
                    UploadError::Transfer(_) => {
                        tracing::warn!(error = %err, "upload abandoned mid-transfer");
                        (StatusCode::BAD_REQUEST, INVALID_UPLOAD)
                    }
                    UploadError::Storage(_) => {
                        tracing::error!(error = %err, "failed to save upload");
                        (StatusCode::INTERNAL_SERVER_ERROR, SAVE_FAILED)
                    }
                };
                if err.is_client_error() {
                    tracing::debug!(error = %err, status = status.as_u16(), "upload rejected");
                }
                (status, message).into_response()
            }
            Self::DirectoryRead(err) => {
                tracing::error!(error = %err, "failed to list upload directory");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to read directory" })),
                )
                    .into_response()
            }
            Self::AssetNotFound => (StatusCode::NOT_FOUND, Html(NOT_FOUND_PAGE)).into_response(),
            Self::AssetRead(err) => {
                tracing::error!(error = %err, "failed to read static file");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Server Error: {}", io_error_code(&err)),
                )
                    .into_response()
            }
            Self::MethodNotAllowed => {
                (StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed").into_response()
            }
        }
    }
}

impl From<UploadError> for ApiError {
    fn from(e: UploadError) -> Self {
        Self::Upload(e)
    }
}

impl From<MultipartError> for ApiError {
    fn from(e: MultipartError) -> Self {
        Self::Upload(e.into())
    }
}

/// Short errno-style code for an I/O error (`EACCES`, `EISDIR`, ...)
pub fn io_error_code(err: &io::Error) -> String {
    let code = match err.kind() {
        io::ErrorKind::NotFound => Some("ENOENT"),
        io::ErrorKind::PermissionDenied => Some("EACCES"),
        io::ErrorKind::IsADirectory => Some("EISDIR"),
        io::ErrorKind::NotADirectory => Some("ENOTDIR"),
        io::ErrorKind::InvalidInput => Some("EINVAL"),
        io::ErrorKind::OutOfMemory => Some("ENOMEM"),
        _ => None,
    };

    match (code, err.raw_os_error()) {
        (Some(code), _) => code.to_string(),
        (None, Some(errno)) => format!("errno {}", errno),
        (None, None) => format!("{:?}", err.kind()),
    }
}
