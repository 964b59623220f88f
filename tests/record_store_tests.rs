use gallery_backend::{
    entities::image::NewImageRecord,
    errors::GalleryError,
    repositories::{http_repo::FirebaseRepo, record::RecordRepository},
    settings::{AppConfig, AppEnvironment},
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_repo(server: &MockServer) -> FirebaseRepo {
    let config = AppConfig {
        env: AppEnvironment::Testing,
        name: "Gallery Test".to_string(),
        port: 0,
        host: "127.0.0.1".to_string(),
        worker_count: 1,
        cloud_name: "demo".to_string(),
        api_key: "key123".to_string(),
        api_secret: "shhh".to_string(),
        upload_preset: "unsigned_preset".to_string(),
        api_base_url: server.uri(),
        firebase_database_url: server.uri(),
        firebase_collection: "images".to_string(),
        delete_api_url: format!("{}/delete-image", server.uri()),
    };
    FirebaseRepo::new(reqwest::Client::new(), &config)
}

fn new_record() -> NewImageRecord {
    NewImageRecord {
        url: "u1".to_string(),
        public_id: "b1".to_string(),
    }
}

#[actix_rt::test]
async fn insert_pushes_record_with_server_value_timestamp() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/images.json"))
        .and(body_partial_json(json!({
            "url": "u1",
            "public_id": "b1",
            "timestamp": { ".sv": "timestamp" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": "-Nrec1" })))
        .expect(1)
        .mount(&server)
        .await;

    let repo = test_repo(&server);
    let record_id = repo.insert(&new_record()).await.unwrap();

    assert_eq!(record_id, "-Nrec1");
}

#[actix_rt::test]
async fn insert_rejection_is_a_store_error_never_silent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/images.json"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "error": "Permission denied" })))
        .mount(&server)
        .await;

    let repo = test_repo(&server);
    let err = repo.insert(&new_record()).await.unwrap_err();

    assert!(matches!(err, GalleryError::Store(_)));
}

#[actix_rt::test]
async fn listing_an_empty_collection_yields_an_empty_snapshot() {
    let server = MockServer::start().await;
    // The store answers a missing collection with literal null.
    Mock::given(method("GET"))
        .and(path("/images.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(null)))
        .mount(&server)
        .await;

    let repo = test_repo(&server);
    let entries = repo.list().await.unwrap();

    assert!(entries.is_empty());
}

#[actix_rt::test]
async fn list_orders_by_push_key_and_skips_records_with_no_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/images.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "-Nb222": { "url": "https://host/b.jpg", "public_id": "b", "timestamp": 2 },
            "-Na111": { "url": "https://host/a.jpg", "public_id": "a", "timestamp": 1 },
            "-Nc333": { "public_id": "broken" }
        })))
        .mount(&server)
        .await;

    let repo = test_repo(&server);
    let entries = repo.list().await.unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].record_id, "-Na111");
    assert_eq!(entries[1].record_id, "-Nb222");
    assert_eq!(entries[0].record.public_id.as_deref(), Some("a"));
}

#[actix_rt::test]
async fn listing_twice_without_mutation_is_identical() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/images.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "-Nr1": { "url": "u1", "public_id": "b1", "timestamp": 1 }
        })))
        .expect(2)
        .mount(&server)
        .await;

    let repo = test_repo(&server);
    let first = repo.list().await.unwrap();
    let second = repo.list().await.unwrap();

    assert_eq!(first, second);
}

#[actix_rt::test]
async fn insert_then_list_round_trips_one_record() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/images.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": "-Nr1" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/images.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "-Nr1": { "url": "u1", "public_id": "b1", "timestamp": 1_700_000_000_000i64 }
        })))
        .mount(&server)
        .await;

    let repo = test_repo(&server);
    let record_id = repo.insert(&new_record()).await.unwrap();
    let entries = repo.list().await.unwrap();

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].record_id, record_id);
    assert_eq!(entries[0].record.url, "u1");
    assert_eq!(entries[0].record.public_id.as_deref(), Some("b1"));
    assert!(entries[0].record.created_at().is_some());
}

#[actix_rt::test]
async fn removing_an_unknown_record_fails_without_deleting() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/images/r1.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(null)))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/images/r1.json"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let repo = test_repo(&server);
    let err = repo.remove("r1").await.unwrap_err();

    assert!(matches!(err, GalleryError::Store(_)));
}

#[actix_rt::test]
async fn remove_deletes_an_existing_record() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/images/r1.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "url": "u1", "public_id": "b1", "timestamp": 1
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/images/r1.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(null)))
        .expect(1)
        .mount(&server)
        .await;

    let repo = test_repo(&server);
    repo.remove("r1").await.unwrap();
}

#[actix_rt::test]
async fn remove_surfaces_a_rejected_delete() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/images/r1.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "url": "u1" })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/images/r1.json"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let repo = test_repo(&server);
    let err = repo.remove("r1").await.unwrap_err();

    assert!(matches!(err, GalleryError::Store(_)));
}
