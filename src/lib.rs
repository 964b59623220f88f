mod domain;
mod interfaces;
pub mod constants;
pub mod errors;
pub mod graceful_shutdown;
pub mod settings;

pub use domain::{entities, use_cases};
pub use interfaces::{handlers, repositories, routes};

use std::sync::Arc;

use repositories::blob::BlobDestroyer;
use repositories::http_repo::CloudinaryRepo;

/// Shared state of the deletion proxy. The destroyer is the only holder of
/// the privileged credential; device-side flows never construct one.
pub struct AppState {
    pub destroyer: Arc<dyn BlobDestroyer>,
}

impl AppState {
    pub fn new(config: &settings::AppConfig) -> Self {
        let client = reqwest::Client::new();

        AppState {
            destroyer: Arc::new(CloudinaryRepo::new(client, config)),
        }
    }

    pub fn with_destroyer(destroyer: Arc<dyn BlobDestroyer>) -> Self {
        AppState { destroyer }
    }
}
