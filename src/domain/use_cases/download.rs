use std::path::PathBuf;

use reqwest::Client;
use tokio::fs;
use tracing::info;
use uuid::Uuid;

use crate::errors::GalleryError;

/// Fetches a gallery image by URL and persists it under the download
/// directory, named after its blob id when one exists.
#[derive(Debug, Clone)]
pub struct ImageDownloader {
    client: Client,
    download_dir: PathBuf,
}

impl ImageDownloader {
    pub fn new(client: Client, download_dir: impl Into<PathBuf>) -> Self {
        ImageDownloader {
            client,
            download_dir: download_dir.into(),
        }
    }

    pub async fn download(
        &self,
        url: &str,
        public_id: Option<&str>,
    ) -> Result<PathBuf, GalleryError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| GalleryError::Download(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GalleryError::Download(format!(
                "HTTP error! status: {}",
                status
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| GalleryError::Download(e.to_string()))?;

        fs::create_dir_all(&self.download_dir)
            .await
            .map_err(|e| GalleryError::Download(format!("cannot create download dir: {}", e)))?;

        let path = self.download_dir.join(file_name(public_id));
        fs::write(&path, &bytes)
            .await
            .map_err(|e| GalleryError::Download(format!("cannot write file: {}", e)))?;

        info!(path = %path.display(), "image saved");
        Ok(path)
    }
}

/// Blob ids can contain folder separators; flatten them so the name stays
/// inside the download directory.
fn file_name(public_id: Option<&str>) -> String {
    match public_id.map(str::trim).filter(|id| !id.is_empty()) {
        Some(id) => format!("{}.jpg", id.replace(['/', '\\'], "_")),
        None => format!("image_{}.jpg", Uuid::new_v4()),
    }
}
