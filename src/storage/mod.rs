//! Object storage collaborator for image attachments (Supabase-style
//! storage HTTP API).

use url::Url;

use crate::config;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("invalid storage URL: {0}")]
    InvalidUrl(String),
    #[error("upload request failed: {0}")]
    Request(String),
    #[error("storage rejected upload with status {status}: {message}")]
    Rejected { status: u16, message: String },
}

pub struct BucketClient {
    base_url: Url,
    bucket: String,
    service_key: String,
    client: reqwest::Client,
}

impl BucketClient {
    pub fn new(
        base_url: &str,
        bucket: impl Into<String>,
        service_key: impl Into<String>,
    ) -> Result<Self, StorageError> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| StorageError::InvalidUrl(e.to_string()))?;

        Ok(Self {
            base_url,
            bucket: bucket.into(),
            service_key: service_key.into(),
            client: reqwest::Client::new(),
        })
    }

    pub fn from_config() -> Result<Self, StorageError> {
        let storage = &config::config().storage;
        Self::new(&storage.base_url, &storage.bucket, &storage.service_key)
    }

    /// Upload bytes under the given key, overwriting an existing object
    pub async fn upload(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        let url = format!("{}/object/{}/{}", self.base_url, self.bucket, key);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.service_key)
            .header("content-type", content_type)
            .header("x-upsert", "true")
            .body(bytes)
            .send()
            .await
            .map_err(|e| StorageError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StorageError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }

    /// Public URL for an uploaded object; no request is made
    pub fn public_url(&self, key: &str) -> Result<Url, StorageError> {
        Url::parse(&format!(
            "{}/object/public/{}/{}",
            self.base_url, self.bucket, key
        ))
        .map_err(|e| StorageError::InvalidUrl(e.to_string()))
    }
}
