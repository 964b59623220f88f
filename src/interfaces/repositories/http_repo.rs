use std::fmt;

use reqwest::Client;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use crate::settings::AppConfig;

/// Cloudinary-backed blob store client. Holds the privileged credential,
/// so it is constructed only on the proxy side; device flows get handed
/// the upload contract alone.
#[derive(Clone)]
pub struct CloudinaryRepo {
    pub client: Client,
    pub upload_url: String,
    pub upload_preset: String,
    pub destroy_url: String,
    pub api_key: String,
    pub(crate) api_secret: Zeroizing<String>,
}

impl CloudinaryRepo {
    pub fn new(client: Client, config: &AppConfig) -> Self {
        CloudinaryRepo {
            client,
            upload_url: config.upload_url(),
            upload_preset: config.upload_preset.clone(),
            destroy_url: config.destroy_url(),
            api_key: config.api_key.clone(),
            api_secret: Zeroizing::new(config.api_secret.clone()),
        }
    }

    /// Request signature over the alphabetically ordered parameters plus
    /// the API secret, hex encoded.
    pub(crate) fn sign(&self, public_id: &str, timestamp: i64) -> String {
        let mut hasher = Sha256::new();
        hasher.update(format!("public_id={}&timestamp={}", public_id, timestamp));
        hasher.update(self.api_secret.as_bytes());
        hasher
            .finalize()
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect()
    }
}

impl fmt::Debug for CloudinaryRepo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudinaryRepo")
            .field("upload_url", &self.upload_url)
            .field("upload_preset", &self.upload_preset)
            .field("destroy_url", &self.destroy_url)
            .field("api_key", &"[REDACTED]")
            .field("api_secret", &"[REDACTED]")
            .finish()
    }
}

/// Firebase Realtime Database client for the flat image collection.
#[derive(Debug, Clone)]
pub struct FirebaseRepo {
    pub client: Client,
    pub database_url: String,
    pub collection: String,
}

impl FirebaseRepo {
    pub fn new(client: Client, config: &AppConfig) -> Self {
        FirebaseRepo {
            client,
            database_url: config.firebase_database_url.clone(),
            collection: config.firebase_collection.clone(),
        }
    }

    pub(crate) fn collection_url(&self) -> String {
        format!(
            "{}/{}.json",
            self.database_url.trim_end_matches('/'),
            self.collection
        )
    }

    pub(crate) fn record_url(&self, record_id: &str) -> String {
        format!(
            "{}/{}/{}.json",
            self.database_url.trim_end_matches('/'),
            self.collection,
            urlencoding::encode(record_id)
        )
    }
}

/// Device-side client of the deletion proxy endpoint.
#[derive(Debug, Clone)]
pub struct DeleteProxyClient {
    pub client: Client,
    pub endpoint: String,
}

impl DeleteProxyClient {
    pub fn new(client: Client, config: &AppConfig) -> Self {
        DeleteProxyClient {
            client,
            endpoint: config.delete_api_url.clone(),
        }
    }
}
