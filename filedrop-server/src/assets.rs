//! Static file serving from the public root
//!
//! `/` maps to `index.html`. Paths are percent-decoded and any `..`
//! segment is refused, so lookups never leave the root.

use std::path::{Path, PathBuf};

use axum::http::header;
use axum::response::{IntoResponse, Response};
use percent_encoding::percent_decode_str;

use crate::error::ApiError;

const INDEX_FILE: &str = "index.html";

/// Directory that GET requests are answered from
#[derive(Debug, Clone)]
pub struct PublicRoot {
    root: PathBuf,
}

impl PublicRoot {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a URL path to a file under the root, or `None` if it would escape
    pub fn resolve(&self, url_path: &str) -> Option<PathBuf> {
        let decoded = percent_decode_str(url_path).decode_utf8().ok()?;
        let relative = decoded.trim_start_matches('/');
        let relative = if relative.is_empty() { INDEX_FILE } else { relative };

        let mut path = self.root.clone();
        for segment in relative.split('/') {
            match segment {
                "" | "." => continue,
                ".." => return None,
                s if s.contains('\\') || s.contains('\0') => return None,
                s => path.push(s),
            }
        }

        Some(path)
    }

    /// Read the file behind `url_path` and answer with its inferred type
    pub async fn serve(&self, url_path: &str) -> Result<Response, ApiError> {
        let path = self.resolve(url_path).ok_or_else(|| {
            tracing::warn!(path = %url_path, "refused path outside public root");
            ApiError::AssetNotFound
        })?;

        let content = match tokio::fs::read(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ApiError::AssetNotFound)
            }
            Err(e) => return Err(ApiError::AssetRead(e)),
        };

        let mime = mime_guess::from_path(&path).first_or_octet_stream();
        Ok(([(header::CONTENT_TYPE, mime.to_string())], content).into_response())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_maps_to_index() {
        let public = PublicRoot::new("/srv/public");
        assert_eq!(public.resolve("/"), Some(PathBuf::from("/srv/public/index.html")));
        assert_eq!(public.resolve(""), Some(PathBuf::from("/srv/public/index.html")));
    }

    #[test]
    fn nested_paths_resolve() {
        let public = PublicRoot::new("/srv/public");
        assert_eq!(
            public.resolve("/css/site.css"),
            Some(PathBuf::from("/srv/public/css/site.css"))
        );
        assert_eq!(
            public.resolve("/./img//logo.png"),
            Some(PathBuf::from("/srv/public/img/logo.png"))
        );
    }

    #[test]
    fn percent_encoded_names_decode() {
        let public = PublicRoot::new("/srv/public");
        assert_eq!(
            public.resolve("/my%20file.pdf"),
            Some(PathBuf::from("/srv/public/my file.pdf"))
        );
    }

    #[test]
    fn traversal_is_refused() {
        let public = PublicRoot::new("/srv/public");
        assert_eq!(public.resolve("/../etc/passwd"), None);
        assert_eq!(public.resolve("/css/../../secret"), None);
        assert_eq!(public.resolve("/%2e%2e/secret"), None);
        assert_eq!(public.resolve("/..%5csecret"), None);
        assert_eq!(public.resolve("/a%00b"), None);
    }
}
