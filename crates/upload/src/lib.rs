//! Publishes processed screenshots to the image-hosting API.

use std::path::Path;

use serde_json::Value;
use tracing::{error, info};

use pagesnap_core::config::UploadConfig;
use pagesnap_core::SnapError;

pub struct Uploader {
    client: reqwest::Client,
    config: UploadConfig,
}

impl Uploader {
    pub fn new(config: UploadConfig) -> Result<Self, SnapError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| SnapError::Upload(e.to_string()))?;
        Ok(Self { client, config })
    }

    /// Upload one image as a multipart form. A non-success HTTP status is
    /// logged and reported as `Ok(None)` so the caller's pipeline continues;
    /// transport errors propagate like any other step.
    pub async fn upload(&self, path: &Path) -> Result<Option<String>, SnapError> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("image.jpg")
            .to_string();

        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("image/jpeg")
            .map_err(|e| SnapError::Upload(e.to_string()))?;
        let form = reqwest::multipart::Form::new()
            .text("key", self.config.api_key.clone())
            .part("source", part)
            .text("album_id", self.config.album_id.clone())
            .text("nsfw", self.config.nsfw.clone());

        let response = self
            .client
            .post(&self.config.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| SnapError::Upload(e.to_string()))?;

        if response.status().is_success() {
            let data: Value = response
                .json()
                .await
                .map_err(|e| SnapError::Upload(e.to_string()))?;
            let image_url = extract_image_url(&data);
            // The API can answer 200 without the URL field; still a success.
            info!(url = ?image_url, "upload succeeded");
            Ok(image_url)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(%status, body = %body, "upload failed");
            Ok(None)
        }
    }
}

/// Pull the nested `image.url` field out of the API response.
pub fn extract_image_url(data: &Value) -> Option<String> {
    data.get("image")?
        .get("url")?
        .as_str()
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extracts_nested_image_url() {
        let data = json!({
            "status_code": 200,
            "image": { "name": "blurred_1", "url": "https://im.ge/i/abc.jpg" }
        });
        assert_eq!(
            extract_image_url(&data),
            Some("https://im.ge/i/abc.jpg".to_string())
        );
    }

    #[test]
    fn test_missing_url_field_is_none_not_error() {
        assert_eq!(extract_image_url(&json!({ "image": {} })), None);
        assert_eq!(extract_image_url(&json!({ "status_code": 200 })), None);
        assert_eq!(extract_image_url(&json!({ "image": { "url": 42 } })), None);
    }
}
