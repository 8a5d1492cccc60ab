/// Structured error types for the upload pipeline.
///
/// `MultipartError` describes why a body could not be read as a single
/// file part. `UploadError` is the pipeline-wide error the HTTP layer maps
/// onto status codes.

use std::io;
use thiserror::Error;

/// Reasons a `multipart/form-data` body was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MultipartError {
    /// Content-Type header has no usable `boundary=` parameter
    #[error("missing boundary parameter in content type")]
    MissingBoundary,

    /// Body never contains the opening `--<boundary>` delimiter
    #[error("opening boundary delimiter not found")]
    NoOpeningBoundary,

    /// Delimiter line is not followed by CRLF or the closing `--`
    #[error("malformed boundary delimiter at byte {offset}")]
    MalformedDelimiter { offset: usize },

    /// Part headers are not terminated by a blank line or are not valid text
    #[error("malformed part headers: {reason}")]
    MalformedHeaders { reason: &'static str },

    /// Part has no `Content-Disposition: form-data` header
    #[error("part is missing a form-data content disposition")]
    MissingDisposition,

    /// Part payload is not followed by `\r\n--<boundary>`
    #[error("part payload is not terminated by a boundary delimiter")]
    Unterminated,

    /// Body contained no parts at all
    #[error("body contains no parts")]
    NoParts,

    /// Body contained more than one part
    #[error("expected a single file part, found {count} parts")]
    UnsupportedParts { count: usize },

    /// The only part is a plain form field, not a file
    #[error("part '{name}' is a form field, not a file")]
    NoFile { name: String },

    /// File part declares no `filename`
    #[error("file part has an empty filename")]
    MissingFilename,

    /// File part has no `Content-Type` header
    #[error("file part has no content type")]
    MissingContentType,

    /// File part carries no bytes
    #[error("file part has an empty payload")]
    EmptyPayload,
}

/// Pipeline-wide error for a single upload request
#[derive(Error, Debug)]
pub enum UploadError {
    /// Body could not be read as one file part
    #[error("malformed upload: {0}")]
    Malformed(#[from] MultipartError),

    /// Declared filename is unusable after sanitizing
    #[error("invalid filename '{filename}'")]
    InvalidFilename { filename: String },

    /// Declared content type is not on the allowlist
    #[error("content type '{content_type}' is not allowed")]
    Validation { content_type: String },

    /// Body exceeded the configured ceiling
    #[error("upload exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },

    /// Connection failed before the body was fully received
    #[error("body transfer failed: {0}")]
    Transfer(String),

    /// Upload directory could not be written or read
    #[error("storage error: {0}")]
    Storage(#[from] io::Error),
}

/// Result type alias for upload pipeline operations
pub type Result<T> = std::result::Result<T, UploadError>;

impl UploadError {
    /// Create an invalid filename error
    pub fn invalid_filename(filename: impl Into<String>) -> Self {
        Self::InvalidFilename {
            filename: filename.into(),
        }
    }

    /// Create a content type validation error
    pub fn validation(content_type: impl Into<String>) -> Self {
        Self::Validation {
            content_type: content_type.into(),
        }
    }

    /// Create a transfer error from any displayable cause
    pub fn transfer(cause: impl std::fmt::Display) -> Self {
        Self::Transfer(cause.to_string())
    }

    /// True for errors caused by the client's request rather than the server
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Storage(_))
    }
}
