//! Client for the external media host that stores uploaded images.

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::Config;
use crate::entities::image::ImageAsset;
use crate::error::ApiError;
use crate::retry::with_retry;

/// An uploaded file as received from a multipart request.
#[derive(Clone, Debug)]
pub struct UploadFile {
    pub original_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// External object storage for images. Products and brands are the sole
/// owners of their assets; nothing else writes or deletes through this.
#[async_trait]
pub trait MediaHost: Send + Sync {
    async fn upload(&self, file: &UploadFile) -> Result<ImageAsset, ApiError>;
    async fn delete_many(&self, public_ids: &[String]) -> Result<(), ApiError>;
}

pub struct HttpMediaHost {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpMediaHost {
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.media_base_url.trim_end_matches('/').to_owned(),
            api_key: config.media_api_key.clone(),
        }
    }

    async fn upload_once(&self, file: &UploadFile) -> Result<ImageAsset, ApiError> {
        let part = reqwest::multipart::Part::bytes(file.bytes.clone())
            .file_name(file.original_name.clone())
            .mime_str(&file.content_type)
            .map_err(|err| ApiError::Upstream(err.to_string()))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(format!("{}/assets", self.base_url))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|err| ApiError::Upstream(err.to_string()))?;

        if !response.status().is_success() {
            return Err(ApiError::Upstream(format!(
                "Media host returned {}",
                response.status()
            )));
        }

        let stored: StoredAsset = response
            .json()
            .await
            .map_err(|err| ApiError::Upstream(err.to_string()))?;

        Ok(ImageAsset {
            public_id: stored.public_id,
            url: stored.url,
            original_name: file.original_name.clone(),
        })
    }

    async fn delete_once(&self, public_ids: &[String]) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(format!("{}/assets", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({ "public_ids": public_ids }))
            .send()
            .await
            .map_err(|err| ApiError::Upstream(err.to_string()))?;

        if !response.status().is_success() {
            return Err(ApiError::Upstream(format!(
                "Media host returned {}",
                response.status()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl MediaHost for HttpMediaHost {
    async fn upload(&self, file: &UploadFile) -> Result<ImageAsset, ApiError> {
        with_retry("media upload", || self.upload_once(file)).await
    }

    async fn delete_many(&self, public_ids: &[String]) -> Result<(), ApiError> {
        if public_ids.is_empty() {
            return Ok(());
        }
        with_retry("media delete", || self.delete_once(public_ids)).await
    }
}

#[derive(Deserialize)]
struct StoredAsset {
    public_id: String,
    url: String,
}
