//! Blob storage port - where uploaded post images end up.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A stored object and the public URL it can be fetched from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredBlob {
    pub url: String,
    pub pathname: String,
}

/// Blob store trait - abstraction over object storage backends.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `bytes` under `pathname` with public read access.
    async fn put(
        &self,
        pathname: &str,
        bytes: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<StoredBlob, BlobError>;
}

/// Build a fresh object name: `uploads/<unix-millis>-<random suffix>`.
pub fn upload_pathname() -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("uploads/{}-{}", millis, &suffix[..12])
}

/// Blob storage errors.
#[derive(Debug, thiserror::Error)]
pub enum BlobError {
    #[error("Invalid object name: {0}")]
    InvalidPath(String),

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Unexpected response from blob service (status {status}): {message}")]
    Remote { status: u16, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_pathname_shape() {
        let name = upload_pathname();
        let rest = name.strip_prefix("uploads/").unwrap();
        let (millis, suffix) = rest.split_once('-').unwrap();

        assert!(millis.parse::<i64>().is_ok());
        assert_eq!(suffix.len(), 12);
        assert_ne!(upload_pathname(), name);
    }
}
