//! Declared content-type allowlist

use std::fmt;
use std::str::FromStr;

use crate::error::UploadError;

/// Content types accepted for upload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AllowedType {
    Jpeg,
    Png,
    Pdf,
}

impl AllowedType {
    pub const ALL: [AllowedType; 3] = [Self::Jpeg, Self::Png, Self::Pdf];

    pub fn as_mime(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Pdf => "application/pdf",
        }
    }
}

impl fmt::Display for AllowedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_mime())
    }
}

impl FromStr for AllowedType {
    type Err = UploadError;

    /// Exact, case-sensitive match; parameters such as `; charset=` are not
    /// stripped.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|allowed| allowed.as_mime() == s)
            .ok_or_else(|| UploadError::validation(s))
    }
}

/// Check a client-declared content type against the allowlist
pub fn validate_content_type(declared: &str) -> Result<AllowedType, UploadError> {
    declared.parse()
}
