//! Cloudinary image upload client.
//!
//! Proxies profile image uploads so the API secret never reaches the
//! browser. Uploads are signed server-side: parameters sorted by key,
//! secret appended, SHA-256 hex digest.

use std::sync::Arc;

use chrono::Utc;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::instrument;

use crate::config::CloudinaryConfig;

/// Incoming images are scaled to fit a 500x500 box, quality auto-tuned.
const UPLOAD_TRANSFORMATION: &str = "c_limit,h_500,w_500/q_auto";

/// Errors that can occur when uploading an image.
#[derive(Debug, Error)]
pub enum CloudinaryError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Upload API rejected the request.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
}

/// A successfully stored image.
#[derive(Debug, Deserialize)]
pub struct UploadedImage {
    pub secure_url: String,
    pub public_id: String,
}

#[derive(Debug, Deserialize)]
struct UploadErrorBody {
    error: UploadErrorDetail,
}

#[derive(Debug, Deserialize)]
struct UploadErrorDetail {
    message: String,
}

/// Cloudinary upload API client.
#[derive(Clone)]
pub struct CloudinaryClient {
    inner: Arc<CloudinaryClientInner>,
}

struct CloudinaryClientInner {
    client: reqwest::Client,
    upload_url: String,
    api_key: String,
    api_secret: SecretString,
    folder: String,
}

impl CloudinaryClient {
    /// Create a new upload client.
    #[must_use]
    pub fn new(config: &CloudinaryConfig) -> Self {
        Self {
            inner: Arc::new(CloudinaryClientInner {
                client: reqwest::Client::new(),
                upload_url: format!(
                    "https://api.cloudinary.com/v1_1/{}/image/upload",
                    config.cloud_name
                ),
                api_key: config.api_key.clone(),
                api_secret: config.api_secret.clone(),
                folder: config.upload_folder.clone(),
            }),
        }
    }

    /// Upload an image given as a data URI or remote URL.
    ///
    /// # Errors
    ///
    /// Returns an API/HTTP error if the upload service rejects the image.
    #[instrument(skip(self, image_data))]
    pub async fn upload_image(&self, image_data: &str) -> Result<UploadedImage, CloudinaryError> {
        let timestamp = Utc::now().timestamp().to_string();
        let signature = self.sign_upload(&timestamp);

        let form = [
            ("file", image_data),
            ("api_key", self.inner.api_key.as_str()),
            ("timestamp", timestamp.as_str()),
            ("signature", signature.as_str()),
            ("folder", self.inner.folder.as_str()),
            ("transformation", UPLOAD_TRANSFORMATION),
        ];

        let response = self
            .inner
            .client
            .post(&self.inner.upload_url)
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<UploadErrorBody>().await {
                Ok(body) => body.error.message,
                Err(_) => "upload rejected".to_string(),
            };
            return Err(CloudinaryError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let uploaded = response.json().await?;
        tracing::info!(folder = %self.inner.folder, "image uploaded");
        Ok(uploaded)
    }

    /// Signature string covers every signed param in key order.
    fn sign_upload(&self, timestamp: &str) -> String {
        let to_sign = format!(
            "folder={}&timestamp={}&transformation={}{}",
            self.inner.folder,
            timestamp,
            UPLOAD_TRANSFORMATION,
            self.inner.api_secret.expose_secret(),
        );
        hex::encode(Sha256::digest(to_sign.as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> CloudinaryClient {
        CloudinaryClient::new(&CloudinaryConfig {
            cloud_name: "ridgeline-test".to_string(),
            api_key: "123456789".to_string(),
            api_secret: SecretString::from("shhh-test-secret"),
            upload_folder: "ridgeline/profiles".to_string(),
        })
    }

    #[test]
    fn upload_url_includes_cloud_name() {
        let client = test_client();
        assert_eq!(
            client.inner.upload_url,
            "https://api.cloudinary.com/v1_1/ridgeline-test/image/upload"
        );
    }

    #[test]
    fn signature_covers_sorted_params_and_secret() {
        let client = test_client();
        let signature = client.sign_upload("1700000000");

        let expected = hex::encode(Sha256::digest(
            "folder=ridgeline/profiles&timestamp=1700000000\
             &transformation=c_limit,h_500,w_500/q_autoshhh-test-secret"
                .as_bytes(),
        ));
        assert_eq!(signature, expected);
    }

    #[test]
    fn signature_changes_with_timestamp() {
        let client = test_client();
        assert_ne!(client.sign_upload("1700000000"), client.sign_upload("1700000001"));
    }

    #[test]
    fn upload_response_parses_with_extra_fields() {
        let body = r#"{
            "secure_url": "https://res.cloudinary.com/ridgeline-test/image/upload/v1/ridgeline/profiles/abc.jpg",
            "public_id": "ridgeline/profiles/abc",
            "width": 500,
            "height": 500,
            "format": "jpg"
        }"#;

        let uploaded: UploadedImage = serde_json::from_str(body).expect("parses");
        assert_eq!(uploaded.public_id, "ridgeline/profiles/abc");
        assert!(uploaded.secure_url.starts_with("https://res.cloudinary.com/"));
    }
}
