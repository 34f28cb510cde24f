use serde::Deserialize;
use std::env;
use tracing::info;

use crate::api::error::ApiError;

/// Client for the external image-storage service: accepts a binary payload,
/// returns a public URL for the stored image.
#[derive(Debug, Clone)]
pub struct ImageStore {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    url: String,
}

impl ImageStore {
    /// Build a client from IMAGE_STORE_URL. Absent configuration is an error
    /// only when an upload is actually attempted.
    pub fn from_env() -> Result<Self, ApiError> {
        let base_url = env::var("IMAGE_STORE_URL").map_err(|_| {
            ApiError::Internal("IMAGE_STORE_URL environment variable not set".to_string())
        })?;

        Ok(Self {
            base_url,
            client: reqwest::Client::new(),
        })
    }

    /// Upload image bytes; the service answers with the public URL.
    #[tracing::instrument(skip(self, bytes), fields(bytes = bytes.len(), mime = %mime))]
    pub async fn upload(&self, bytes: Vec<u8>, mime: &str) -> Result<String, ApiError> {
        let response = self
            .client
            .post(format!("{}/upload", self.base_url))
            .header("Content-Type", mime)
            .body(bytes)
            .send()
            .await
            .map_err(|e| ApiError::Internal(format!("Image upload failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(ApiError::Internal(format!(
                "Image store responded with status {}",
                response.status()
            )));
        }

        let uploaded: UploadResponse = response
            .json()
            .await
            .map_err(|e| ApiError::Internal(format!("Invalid image store response: {}", e)))?;

        info!(url = %uploaded.url, "Uploaded image");
        Ok(uploaded.url)
    }
}
