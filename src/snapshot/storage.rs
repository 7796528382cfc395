use async_trait::async_trait;
use reqwest::header;
use std::time::Duration;

use super::SnapshotError;

/// Durable object storage for captured thumbnails. `put` returns the
/// public-accessible address of the stored object.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, SnapshotError>;
}

const UPLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Blob store speaking plain HTTP PUT against an S3-compatible endpoint.
/// No retry: a failed upload is treated as "no thumbnail available".
pub struct HttpBlobStore {
    client: reqwest::Client,
    endpoint: String,
    public_base_url: String,
    api_token: Option<String>,
}

impl HttpBlobStore {
    pub fn new(endpoint: String, public_base_url: String, api_token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            public_base_url,
            api_token,
        }
    }
}

#[async_trait]
impl BlobStore for HttpBlobStore {
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, SnapshotError> {
        let url = format!("{}/{}", self.endpoint.trim_end_matches('/'), key);

        let mut request = self
            .client
            .put(&url)
            .header(header::CONTENT_TYPE, content_type)
            .timeout(UPLOAD_TIMEOUT)
            .body(bytes);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        request
            .send()
            .await?
            .error_for_status()
            .map_err(|e| SnapshotError::Upload(e.to_string()))?;

        Ok(format!(
            "{}/{}",
            self.public_base_url.trim_end_matches('/'),
            key
        ))
    }
}
