//! Upload directory storage
//!
//! Writes payloads under their storage name and lists what is stored.
//! The directory is created once by [`UploadStore::open`] before the server
//! accepts connections. Writes are plain `fs::write` calls: no locking and no
//! atomic rename, so a failed write can leave a partial file behind.

use std::io;
use std::path::{Path, PathBuf};

use filedrop_core::{sanitize_filename, storage_name_now, ExtractedFile, UploadError};
use tokio::fs;

/// A payload persisted in the upload directory
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub storage_name: String,
    pub path: PathBuf,
    pub size: u64,
}

/// Handle on the upload directory
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    /// Create the upload directory if missing and return a handle to it
    pub async fn open(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).await?;
        tracing::info!(upload_dir = %dir.display(), "upload directory ready");
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `payload` to `<dir>/<storage_name>`, replacing any existing file
    pub async fn write(&self, storage_name: &str, payload: &[u8]) -> Result<StoredFile, UploadError> {
        let path = self.dir.join(storage_name);
        fs::write(&path, payload).await?;

        Ok(StoredFile {
            storage_name: storage_name.to_string(),
            path,
            size: payload.len() as u64,
        })
    }

    /// Name and persist an extracted upload
    pub async fn save(&self, file: &ExtractedFile) -> Result<StoredFile, UploadError> {
        let filename = sanitize_filename(&file.filename)?;
        if filename != file.filename {
            tracing::warn!(
                declared = %file.filename,
                sanitized = %filename,
                "declared filename rewritten"
            );
        }

        let name = storage_name_now(&filename);
        self.write(&name, &file.payload).await
    }

    /// Entry names in the upload directory, in filesystem order
    pub async fn list(&self) -> Result<Vec<String>, UploadError> {
        let mut entries = fs::read_dir(&self.dir).await?;
        let mut names = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }

        Ok(names)
    }
}
