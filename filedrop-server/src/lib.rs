//! filedrop-server: HTTP surface for filedrop
//!
//! Routes:
//! - `POST /upload`: single-file multipart upload into the upload directory
//! - `GET /files`: JSON array of stored file names
//! - `GET /health`: liveness
//! - anything else: static files from the public root

pub mod assets;
pub mod body;
pub mod config;
pub mod error;
pub mod routes;
pub mod server;
pub mod state;
pub mod store;

pub use assets::PublicRoot;
pub use config::{ServerArgs, ServerConfig};
pub use error::ApiError;
pub use server::{build_router, run_server, ServerError};
pub use state::AppState;
pub use store::{StoredFile, UploadStore};
