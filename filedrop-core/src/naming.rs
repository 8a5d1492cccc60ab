//! Storage names for uploaded files
//!
//! Format: `{epoch_millis}_{filename}`
//!
//! The millisecond prefix keeps names unique at normal request rates. Two
//! uploads of the same filename within one millisecond get the same name and
//! the later write replaces the earlier one.

use chrono::{DateTime, Utc};

use crate::error::UploadError;

/// Reduce a client-declared filename to a single safe path component.
///
/// Keeps the text after the last `/` or `\` and drops control characters.
/// Ordinary names pass through unchanged.
pub fn sanitize_filename(declared: &str) -> Result<String, UploadError> {
    let base = declared.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(declared);
    let cleaned: String = base.chars().filter(|c| !c.is_control()).collect();

    match cleaned.as_str() {
        "" | "." | ".." => Err(UploadError::invalid_filename(declared)),
        _ => Ok(cleaned),
    }
}

/// Storage name for `filename` stamped at `at`
pub fn storage_name(filename: &str, at: DateTime<Utc>) -> String {
    format!("{}_{}", at.timestamp_millis(), filename)
}

/// Storage name for `filename` stamped with the current time
pub fn storage_name_now(filename: &str) -> String {
    storage_name(filename, Utc::now())
}
