use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;

use crate::{
    entities::image::{GalleryEntry, ImageRecord, NewImageRecord},
    errors::GalleryError,
    repositories::http_repo::FirebaseRepo,
};

/// Metadata records in the realtime store, keyed by server-assigned push
/// ids. `remove` does not distinguish an unknown id from a rejected write;
/// the flows above are built to live with that ambiguity.
#[async_trait]
pub trait RecordRepository: Send + Sync {
    async fn insert(&self, record: &NewImageRecord) -> Result<String, GalleryError>;
    async fn list(&self) -> Result<Vec<GalleryEntry>, GalleryError>;
    async fn remove(&self, record_id: &str) -> Result<(), GalleryError>;
}

#[derive(Deserialize)]
struct PushResponse {
    name: String,
}

/// Raw wire shape. `url` stays optional here so one malformed legacy entry
/// cannot sink the whole snapshot.
#[derive(Deserialize)]
struct RawRecord {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    public_id: Option<String>,
    #[serde(default)]
    timestamp: Option<i64>,
}

#[async_trait]
impl RecordRepository for FirebaseRepo {
    async fn insert(&self, record: &NewImageRecord) -> Result<String, GalleryError> {
        // The store fills in the write time itself; clients never supply one.
        let body = serde_json::json!({
            "url": record.url,
            "public_id": record.public_id,
            "timestamp": { ".sv": "timestamp" },
        });

        let response = self
            .client
            .post(self.collection_url())
            .json(&body)
            .send()
            .await
            .map_err(|e| GalleryError::Store(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GalleryError::Store(format!(
                "record insert rejected: HTTP {}",
                status
            )));
        }

        let pushed: PushResponse = response
            .json()
            .await
            .map_err(|e| GalleryError::Store(format!("unreadable insert response: {}", e)))?;

        if pushed.name.is_empty() {
            return Err(GalleryError::Store(
                "store returned no record id".to_string(),
            ));
        }

        Ok(pushed.name)
    }

    async fn list(&self) -> Result<Vec<GalleryEntry>, GalleryError> {
        let response = self
            .client
            .get(self.collection_url())
            .send()
            .await
            .map_err(|e| GalleryError::Store(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GalleryError::Store(format!(
                "record list rejected: HTTP {}",
                status
            )));
        }

        // An empty collection comes back as literal `null`, not an error.
        // BTreeMap keeps push-key order, which is insertion order.
        let snapshot: Option<BTreeMap<String, RawRecord>> = response
            .json()
            .await
            .map_err(|e| GalleryError::Store(format!("unreadable list response: {}", e)))?;

        let entries = snapshot
            .unwrap_or_default()
            .into_iter()
            .filter_map(|(record_id, raw)| match raw.url {
                Some(url) if !url.is_empty() => Some(GalleryEntry {
                    record_id,
                    record: ImageRecord {
                        url,
                        public_id: raw.public_id,
                        timestamp: raw.timestamp,
                    },
                }),
                _ => {
                    warn!(%record_id, "skipping record with no url");
                    None
                }
            })
            .collect();

        Ok(entries)
    }

    async fn remove(&self, record_id: &str) -> Result<(), GalleryError> {
        // The store answers DELETE with success even for keys that never
        // existed, so probe first to keep the unknown-id contract.
        let probe = self
            .client
            .get(self.record_url(record_id))
            .send()
            .await
            .map_err(|e| GalleryError::Store(e.to_string()))?;

        if !probe.status().is_success() {
            return Err(GalleryError::Store(format!(
                "record lookup rejected: HTTP {}",
                probe.status()
            )));
        }

        let existing: serde_json::Value = probe
            .json()
            .await
            .map_err(|e| GalleryError::Store(format!("unreadable record response: {}", e)))?;

        if existing.is_null() {
            return Err(GalleryError::Store(format!(
                "record {} not found",
                record_id
            )));
        }

        let response = self
            .client
            .delete(self.record_url(record_id))
            .send()
            .await
            .map_err(|e| GalleryError::Store(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GalleryError::Store(format!(
                "record remove rejected: HTTP {}",
                response.status()
            )));
        }

        Ok(())
    }
}
