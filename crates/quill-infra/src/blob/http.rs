//! Remote blob store over HTTP.
//!
//! Speaks the simple object API used by hosted blob services: an
//! authenticated `PUT {api_url}/{pathname}` with the raw bytes as body,
//! answered by a JSON document carrying the public `url`.

use async_trait::async_trait;
use serde::Deserialize;

use quill_core::ports::{BlobError, BlobStore, StoredBlob};

/// Remote blob store configuration.
#[derive(Debug, Clone)]
pub struct HttpBlobConfig {
    pub api_url: String,
    pub token: String,
}

#[derive(Debug, Deserialize)]
struct PutResponse {
    url: String,
    #[serde(default)]
    pathname: Option<String>,
}

/// Blob store backed by a remote blob service.
pub struct HttpBlobStore {
    client: reqwest::Client,
    config: HttpBlobConfig,
}

impl HttpBlobStore {
    pub fn new(config: HttpBlobConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl BlobStore for HttpBlobStore {
    async fn put(
        &self,
        pathname: &str,
        bytes: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<StoredBlob, BlobError> {
        let url = format!("{}/{}", self.config.api_url.trim_end_matches('/'), pathname);

        let mut request = self
            .client
            .put(&url)
            .bearer_auth(&self.config.token)
            .header("x-access", "public")
            .body(bytes);
        if let Some(content_type) = content_type {
            request = request.header(reqwest::header::CONTENT_TYPE, content_type);
        }

        let response = request
            .send()
            .await
            .map_err(|e| BlobError::UploadFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), pathname = %pathname, "Blob service rejected upload");
            return Err(BlobError::Remote {
                status: status.as_u16(),
                message,
            });
        }

        let body: PutResponse = response
            .json()
            .await
            .map_err(|e| BlobError::UploadFailed(format!("invalid response body: {e}")))?;

        Ok(StoredBlob {
            url: body.url,
            pathname: body.pathname.unwrap_or_else(|| pathname.to_string()),
        })
    }
}
