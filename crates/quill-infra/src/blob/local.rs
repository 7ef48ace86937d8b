//! Filesystem blob store - writes uploads under a directory that a static
//! file server or CDN exposes at `public_base_url`.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;

use quill_core::ports::{BlobError, BlobStore, StoredBlob};

/// Local blob store configuration.
#[derive(Debug, Clone)]
pub struct LocalBlobConfig {
    pub root: PathBuf,
    pub public_base_url: String,
}

impl Default for LocalBlobConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("./data/blobs"),
            public_base_url: "http://127.0.0.1:8080/blobs".to_string(),
        }
    }
}

/// Blob store backed by the local filesystem.
pub struct LocalBlobStore {
    config: LocalBlobConfig,
}

impl LocalBlobStore {
    pub fn new(config: LocalBlobConfig) -> Self {
        Self { config }
    }

    fn resolve(&self, pathname: &str) -> Result<PathBuf, BlobError> {
        let relative = Path::new(pathname);
        let is_plain = !pathname.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));

        if !is_plain {
            return Err(BlobError::InvalidPath(pathname.to_string()));
        }

        Ok(self.config.root.join(relative))
    }

    fn public_url(&self, pathname: &str) -> String {
        format!(
            "{}/{}",
            self.config.public_base_url.trim_end_matches('/'),
            pathname
        )
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn put(
        &self,
        pathname: &str,
        bytes: Vec<u8>,
        _content_type: Option<&str>,
    ) -> Result<StoredBlob, BlobError> {
        let path = self.resolve(pathname)?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| BlobError::UploadFailed(e.to_string()))?;
        }

        let size = bytes.len();
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| BlobError::UploadFailed(e.to_string()))?;

        tracing::debug!(pathname = %pathname, size, "Stored blob on disk");

        Ok(StoredBlob {
            url: self.public_url(pathname),
            pathname: pathname.to_string(),
        })
    }
}
