//! Application state shared across handlers

use std::sync::Arc;

use crate::assets::PublicRoot;
use crate::store::UploadStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    uploads: UploadStore,
    public: PublicRoot,
    max_upload_bytes: usize,
}

impl AppState {
    pub fn new(uploads: UploadStore, public: PublicRoot, max_upload_bytes: usize) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                uploads,
                public,
                max_upload_bytes,
            }),
        }
    }

    pub fn uploads(&self) -> &UploadStore {
        &self.inner.uploads
    }

    pub fn public(&self) -> &PublicRoot {
        &self.inner.public
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.inner.max_upload_bytes
    }
}
