use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One gallery record as stored in the record store. `public_id` can be
/// absent on legacy entries written before blob bookkeeping existed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageRecord {
    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_id: Option<String>,

    /// Server-assigned write time, epoch milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl ImageRecord {
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp.and_then(DateTime::from_timestamp_millis)
    }
}

/// A record paired with its store-assigned key. Keys sort in insertion
/// order, which is the order `list` returns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GalleryEntry {
    pub record_id: String,
    pub record: ImageRecord,
}

/// Result of a successful blob upload.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedBlob {
    pub public_id: String,
    pub url: String,
}

/// Insert payload for the record store. The repository attaches the
/// server-value timestamp on the wire, so it has no field here.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewImageRecord {
    pub url: String,
    pub public_id: String,
}

impl From<&UploadedBlob> for NewImageRecord {
    fn from(blob: &UploadedBlob) -> Self {
        NewImageRecord {
            url: blob.url.clone(),
            public_id: blob.public_id.clone(),
        }
    }
}

/// The blob host's deletion result. Unknown fields ride along in `extra`
/// so the proxy can return the payload untransformed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct DestroyResponse {
    #[serde(default)]
    pub result: String,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl DestroyResponse {
    pub fn ok() -> Self {
        DestroyResponse {
            result: "ok".to_string(),
            extra: serde_json::Map::new(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.result == "ok"
    }
}

/// Body of `POST /delete-image`. A missing field deserializes to an empty
/// string and is rejected with the same 400 as an explicit empty one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteImageRequest {
    #[serde(default)]
    pub public_id: String,
}
