use async_trait::async_trait;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::{info, instrument};

use crate::error::UploadError;
use crate::form::PendingImage;
use crate::ports::ImageStore;

pub const DEFAULT_UPLOAD_BASE: &str = "https://api.cloudinary.com/v1_1";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudinaryConfig {
    pub base_url: String,
    pub cloud_name: String,
    pub upload_preset: String,
    pub api_key: Option<String>,
}

impl CloudinaryConfig {
    pub fn upload_url(&self) -> String {
        format!(
            "{}/{}/auto/upload",
            self.base_url.trim_end_matches('/'),
            self.cloud_name
        )
    }
}

/// Unsigned uploads to a Cloudinary upload preset.
#[derive(Debug, Clone)]
pub struct CloudinaryStore {
    client: Client,
    config: CloudinaryConfig,
}

#[derive(Deserialize)]
struct UploadResponse {
    public_id: Option<String>,
}

impl CloudinaryStore {
    pub fn new(config: CloudinaryConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn form(&self, image: &PendingImage) -> Result<Form, UploadError> {
        let mut part = Part::bytes(image.bytes.clone()).file_name(image.file_name.clone());
        if let Some(content_type) = &image.content_type {
            part = part.mime_str(content_type)?;
        }
        let mut form = Form::new()
            .part("file", part)
            .text("upload_preset", self.config.upload_preset.clone());
        if let Some(api_key) = &self.config.api_key {
            form = form.text("api_key", api_key.clone());
        }
        Ok(form)
    }
}

#[async_trait]
impl ImageStore for CloudinaryStore {
    #[instrument(skip_all, fields(file = %image.file_name))]
    async fn upload(&self, image: &PendingImage) -> Result<String, UploadError> {
        let response = self
            .client
            .post(self.config.upload_url())
            .multipart(self.form(image)?)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(UploadError::Rejected { status, message });
        }

        let body: UploadResponse = response.json().await?;
        let public_id = body.public_id.ok_or(UploadError::MissingPublicId)?;
        info!(%public_id, "image uploaded");
        Ok(public_id)
    }
}

/// Stands in when no image storage is configured; every upload fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoImageStore;

#[async_trait]
impl ImageStore for NoImageStore {
    async fn upload(&self, _image: &PendingImage) -> Result<String, UploadError> {
        Err(UploadError::NotConfigured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> CloudinaryConfig {
        CloudinaryConfig {
            base_url: format!("{DEFAULT_UPLOAD_BASE}/"),
            cloud_name: "boh".to_string(),
            upload_preset: "dishes".to_string(),
            api_key: None,
        }
    }

    #[test]
    fn test_upload_url() {
        assert_eq!(
            config().upload_url(),
            "https://api.cloudinary.com/v1_1/boh/auto/upload"
        );
    }

    #[test]
    fn test_bad_content_type_is_rejected() {
        let store = CloudinaryStore::new(config());
        let image = PendingImage {
            file_name: "x".to_string(),
            content_type: Some("not a mime".to_string()),
            bytes: vec![],
        };
        assert!(matches!(store.form(&image), Err(UploadError::Transport(_))));
    }

    #[tokio::test]
    async fn test_unconfigured_store_refuses() {
        let image = PendingImage {
            file_name: "x.png".to_string(),
            content_type: None,
            bytes: vec![1],
        };
        assert!(matches!(
            NoImageStore.upload(&image).await,
            Err(UploadError::NotConfigured)
        ));
    }
}
