//! Media service
//!
//! Stores uploaded images either on the local filesystem or on a cloud
//! media host (Cloudinary-compatible upload API), selected by the
//! configured driver. Also produces signed payloads for direct browser
//! uploads so the admin panel can bypass the server for large files.
//!
//! Cloud request signatures follow the host's scheme: the sorted
//! `key=value` parameter string concatenated with the API secret, hashed
//! with SHA-256 and hex-encoded.

use chrono::Utc;
use data_encoding::HEXLOWER;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tokio::fs;
use uuid::Uuid;

use crate::config::{MediaConfig, MediaDriver, UploadConfig};

/// Error types for media operations
#[derive(Debug, thiserror::Error)]
pub enum MediaServiceError {
    /// File type is not an accepted image format
    #[error("Invalid file type: {0}")]
    InvalidType(String),

    /// File exceeds the size limit
    #[error("File too large: {size} bytes (max {max})")]
    TooLarge { size: u64, max: u64 },

    /// The cloud driver is selected but not fully configured
    #[error("Media host not configured")]
    NotConfigured,

    /// The media host rejected or failed the upload
    #[error("Media host upload failed: {0}")]
    UploadFailed(String),

    /// Local filesystem failure
    #[error("Failed to store file: {0}")]
    Storage(#[from] std::io::Error),
}

/// A stored upload
#[derive(Debug, Clone, Serialize)]
pub struct StoredMedia {
    /// Public URL of the stored file
    pub url: String,
}

/// Signed payload for a direct browser upload
#[derive(Debug, Clone, Serialize)]
pub struct UploadSignature {
    pub signature: String,
    pub timestamp: i64,
    pub cloud_name: String,
    pub api_key: String,
    pub folder: String,
}

#[derive(Debug, Deserialize)]
struct CloudUploadResponse {
    secure_url: String,
}

/// Media service handling image storage
pub struct MediaService {
    media: MediaConfig,
    upload: UploadConfig,
    client: reqwest::Client,
}

impl MediaService {
    /// Create a new media service
    pub fn new(media: MediaConfig, upload: UploadConfig) -> Self {
        Self {
            media,
            upload,
            client: reqwest::Client::new(),
        }
    }

    /// Validate and store an uploaded image, returning its public URL.
    pub async fn store(
        &self,
        filename: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> Result<StoredMedia, MediaServiceError> {
        if !self.upload.is_type_allowed(content_type) {
            return Err(MediaServiceError::InvalidType(content_type.to_string()));
        }
        if data.len() as u64 > self.upload.max_file_size {
            return Err(MediaServiceError::TooLarge {
                size: data.len() as u64,
                max: self.upload.max_file_size,
            });
        }

        match self.media.driver {
            MediaDriver::Local => self.store_local(filename, content_type, &data).await,
            MediaDriver::Cloud => self.store_cloud(filename, data).await,
        }
    }

    async fn store_local(
        &self,
        filename: &str,
        content_type: &str,
        data: &[u8],
    ) -> Result<StoredMedia, MediaServiceError> {
        if !self.upload.path.exists() {
            fs::create_dir_all(&self.upload.path).await?;
        }

        let ext = get_extension(filename, content_type);
        let new_filename = format!("{}.{}", Uuid::new_v4(), ext);
        let file_path = self.upload.path.join(&new_filename);

        fs::write(&file_path, data).await?;

        Ok(StoredMedia {
            url: format!("/uploads/{}", new_filename),
        })
    }

    async fn store_cloud(
        &self,
        filename: &str,
        data: Vec<u8>,
    ) -> Result<StoredMedia, MediaServiceError> {
        if self.media.cloud_name.is_empty()
            || self.media.api_key.is_empty()
            || self.media.api_secret.is_empty()
        {
            return Err(MediaServiceError::NotConfigured);
        }

        let timestamp = Utc::now().timestamp();
        let signature = sign_params(
            &[
                ("folder", self.media.folder.as_str()),
                ("timestamp", &timestamp.to_string()),
            ],
            &self.media.api_secret,
        );

        let part = reqwest::multipart::Part::bytes(data).file_name(filename.to_string());
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("api_key", self.media.api_key.clone())
            .text("timestamp", timestamp.to_string())
            .text("folder", self.media.folder.clone())
            .text("signature", signature);

        let url = format!(
            "https://api.cloudinary.com/v1_1/{}/image/upload",
            self.media.cloud_name
        );

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| MediaServiceError::UploadFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("Media host rejected upload: {} {}", status, body);
            return Err(MediaServiceError::UploadFailed(format!(
                "host returned {}",
                status
            )));
        }

        let uploaded: CloudUploadResponse = response
            .json()
            .await
            .map_err(|e| MediaServiceError::UploadFailed(e.to_string()))?;

        Ok(StoredMedia {
            url: uploaded.secure_url,
        })
    }

    /// Produce a signed payload for a direct browser upload.
    pub fn signature(&self) -> Result<UploadSignature, MediaServiceError> {
        if self.media.cloud_name.is_empty()
            || self.media.api_key.is_empty()
            || self.media.api_secret.is_empty()
        {
            return Err(MediaServiceError::NotConfigured);
        }

        let timestamp = Utc::now().timestamp();
        let signature = sign_params(
            &[
                ("folder", self.media.folder.as_str()),
                ("timestamp", &timestamp.to_string()),
            ],
            &self.media.api_secret,
        );

        Ok(UploadSignature {
            signature,
            timestamp,
            cloud_name: self.media.cloud_name.clone(),
            api_key: self.media.api_key.clone(),
            folder: self.media.folder.clone(),
        })
    }
}

/// Sign request parameters the way the media host expects: parameters
/// sorted by key, joined as `key=value` with `&`, secret appended, then
/// SHA-256 hex.
fn sign_params(params: &[(&str, &str)], secret: &str) -> String {
    let mut sorted: Vec<_> = params.to_vec();
    sorted.sort_by_key(|(k, _)| *k);

    let joined = sorted
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(joined.as_bytes());
    hasher.update(secret.as_bytes());
    HEXLOWER.encode(&hasher.finalize())
}

/// Get file extension from filename or content type
fn get_extension(filename: &str, content_type: &str) -> String {
    if let Some(ext) = filename.rsplit('.').next() {
        if !ext.is_empty() && ext.len() < 10 && ext != filename {
            return ext.to_lowercase();
        }
    }

    match content_type {
        "image/jpeg" | "image/jpg" => "jpg".to_string(),
        "image/png" => "png".to_string(),
        "image/gif" => "gif".to_string(),
        "image/webp" => "webp".to_string(),
        _ => "bin".to_string(),
    }
}
