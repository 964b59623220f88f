use async_trait::async_trait;
use serde::Deserialize;

use crate::{
    entities::image::DestroyResponse,
    errors::GalleryError,
    repositories::http_repo::DeleteProxyClient,
};

/// Blob deletion as seen from the device: a single remote call against the
/// proxy, which holds the credential the device must never have.
#[async_trait]
pub trait BlobDeletionApi: Send + Sync {
    async fn delete_blob(&self, public_id: &str) -> Result<DestroyResponse, GalleryError>;
}

#[derive(Deserialize)]
struct ProxyErrorBody {
    error: Option<String>,
    message: Option<String>,
}

#[async_trait]
impl BlobDeletionApi for DeleteProxyClient {
    async fn delete_blob(&self, public_id: &str) -> Result<DestroyResponse, GalleryError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&serde_json::json!({ "public_id": public_id }))
            .send()
            .await
            .map_err(|e| GalleryError::Proxy(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ProxyErrorBody>()
                .await
                .ok()
                .and_then(|body| body.error.or(body.message))
                .unwrap_or_else(|| format!("deletion API error! status: {}", status));
            return Err(GalleryError::Proxy(message));
        }

        response
            .json()
            .await
            .map_err(|e| GalleryError::Proxy(format!("unreadable deletion response: {}", e)))
    }
}
