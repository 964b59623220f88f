use async_trait::async_trait;
use chrono::Utc;
use reqwest::multipart;
use serde::Deserialize;
use tracing::info;

use crate::{
    entities::image::{DestroyResponse, UploadedBlob},
    errors::GalleryError,
    repositories::http_repo::CloudinaryRepo,
};

/// Unprivileged side of the blob store: unsigned preset uploads. Repeated
/// uploads of the same payload create distinct blobs; nothing here is
/// idempotent.
#[async_trait]
pub trait BlobRepository: Send + Sync {
    async fn upload(&self, payload: &[u8]) -> Result<UploadedBlob, GalleryError>;
}

/// Privileged side of the blob store. Only the deletion proxy constructs an
/// implementation of this; a device-side caller has no credential to sign
/// with and must go through the proxy endpoint instead.
#[async_trait]
pub trait BlobDestroyer: Send + Sync {
    async fn destroy(&self, public_id: &str) -> Result<DestroyResponse, GalleryError>;
}

#[derive(Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
    public_id: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<ErrorDetail>,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

async fn error_message(response: reqwest::Response) -> String {
    let status = response.status();
    response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.error)
        .map(|detail| detail.message)
        .unwrap_or_else(|| format!("HTTP error! status: {}", status))
}

#[async_trait]
impl BlobRepository for CloudinaryRepo {
    async fn upload(&self, payload: &[u8]) -> Result<UploadedBlob, GalleryError> {
        let kind = infer::get(payload)
            .filter(|k| k.matcher_type() == infer::MatcherType::Image)
            .ok_or_else(|| {
                GalleryError::Upload("payload is not a recognized image format".to_string())
            })?;

        let part = multipart::Part::bytes(payload.to_vec())
            .file_name(format!("upload.{}", kind.extension()))
            .mime_str(kind.mime_type())
            .map_err(|e| GalleryError::Upload(format!("invalid mime type: {}", e)))?;

        let form = multipart::Form::new()
            .part("file", part)
            .text("upload_preset", self.upload_preset.clone());

        let response = self
            .client
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| GalleryError::Upload(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GalleryError::Upload(error_message(response).await));
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| GalleryError::Upload(format!("unreadable upload response: {}", e)))?;

        match (body.secure_url, body.public_id) {
            (Some(url), Some(public_id)) if !url.is_empty() && !public_id.is_empty() => {
                info!(%public_id, "image uploaded to blob store");
                Ok(UploadedBlob { public_id, url })
            }
            _ => Err(GalleryError::Upload(
                "unexpected response from image host".to_string(),
            )),
        }
    }
}

#[async_trait]
impl BlobDestroyer for CloudinaryRepo {
    async fn destroy(&self, public_id: &str) -> Result<DestroyResponse, GalleryError> {
        let timestamp = Utc::now().timestamp();
        let signature = self.sign(public_id, timestamp);

        let params = [
            ("public_id", public_id.to_string()),
            ("timestamp", timestamp.to_string()),
            ("api_key", self.api_key.clone()),
            ("signature", signature),
            ("signature_algorithm", "sha256".to_string()),
        ];

        let response = self
            .client
            .post(&self.destroy_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| GalleryError::Delete(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GalleryError::Delete(error_message(response).await));
        }

        let result: DestroyResponse = response
            .json()
            .await
            .map_err(|e| GalleryError::Delete(format!("unreadable destroy response: {}", e)))?;

        info!(%public_id, result = %result.result, "blob destroy requested");
        Ok(result)
    }
}
