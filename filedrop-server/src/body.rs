//! Request body accumulation
//!
//! Uploads are parsed only after the whole body has arrived. Chunks are
//! gathered into one contiguous buffer; a single-chunk body is passed through
//! without copying.

use axum::body::Body;
use bytes::{Bytes, BytesMut};
use futures::StreamExt;
use filedrop_core::UploadError;

/// Collect `body` into one buffer, failing once more than `limit` bytes arrive.
pub async fn accumulate(body: Body, limit: usize) -> Result<Bytes, UploadError> {
    let mut stream = body.into_data_stream();
    let mut first: Option<Bytes> = None;
    let mut joined = BytesMut::new();
    let mut received = 0usize;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(UploadError::transfer)?;
        received += chunk.len();
        if received > limit {
            return Err(UploadError::PayloadTooLarge { limit });
        }

        match first.take() {
            None if joined.is_empty() => first = Some(chunk),
            None => joined.extend_from_slice(&chunk),
            Some(head) => {
                joined.reserve(head.len() + chunk.len());
                joined.extend_from_slice(&head);
                joined.extend_from_slice(&chunk);
            }
        }
    }

    tracing::debug!(bytes = received, "request body received");
    Ok(first.unwrap_or_else(|| joined.freeze()))
}
