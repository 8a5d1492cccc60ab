//! filedrop-core: upload ingestion pipeline
//!
//! Pure, runtime-free pieces of the upload path:
//! - `multipart`: single-file extraction from a `multipart/form-data` body
//! - `validate`: declared content-type allowlist
//! - `naming`: filename sanitizing and timestamped storage names
//!
//! The HTTP surface, body accumulation and disk I/O live in `filedrop-server`.

pub mod error;
pub mod multipart;
pub mod naming;
pub mod validate;

pub use error::{MultipartError, Result, UploadError};
pub use multipart::{extract_single_file, parse_boundary, parse_parts, ExtractedFile, Part};
pub use naming::{sanitize_filename, storage_name, storage_name_now};
pub use validate::{validate_content_type, AllowedType};
