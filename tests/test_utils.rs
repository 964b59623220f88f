use std::{net::TcpListener, sync::Arc, time::Duration};

use actix_cors::Cors;
use actix_web::{http::header, middleware::NormalizePath, web, App, HttpServer};
use async_trait::async_trait;
use gallery_backend::{
    entities::image::DestroyResponse,
    errors::GalleryError,
    repositories::blob::BlobDestroyer,
    routes::configure_routes,
    AppState,
};
use mockall::mock;
use reqwest::Client;

mock! {
    pub Destroyer {}

    #[async_trait]
    impl BlobDestroyer for Destroyer {
        async fn destroy(&self, public_id: &str) -> Result<DestroyResponse, GalleryError>;
    }
}

/// Spawns the deletion proxy on a random port with an injected destroyer,
/// mirroring the production wiring minus the real credential.
pub struct TestApp {
    pub address: String,
    pub client: Client,
}

impl TestApp {
    pub async fn spawn(destroyer: Arc<dyn BlobDestroyer>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let state = web::Data::new(AppState::with_destroyer(destroyer));

        let server = HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allowed_methods(vec!["POST", "OPTIONS"])
                .allowed_header(header::CONTENT_TYPE);

            App::new()
                .app_data(state.clone())
                .wrap(NormalizePath::trim())
                .wrap(cors)
                .configure(configure_routes)
        })
        .listen(listener)
        .expect("Failed to bind server")
        .workers(1)
        .run();

        tokio::spawn(server);

        let client = Client::new();
        while client
            .get(format!("{}/health", address))
            .send()
            .await
            .is_err()
        {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        TestApp { address, client }
    }

    #[allow(dead_code)]
    pub fn delete_endpoint(&self) -> String {
        format!("{}/delete-image", self.address)
    }
}
