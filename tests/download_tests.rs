use gallery_backend::{errors::GalleryError, use_cases::download::ImageDownloader};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[actix_rt::test]
async fn download_persists_the_blob_under_its_public_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/abc123.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"jpeg bytes".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let downloader =
        ImageDownloader::new(reqwest::Client::new(), dir.path().join("Download"));

    let saved = downloader
        .download(&format!("{}/abc123.jpg", server.uri()), Some("abc123"))
        .await
        .unwrap();

    assert!(saved.ends_with("Download/abc123.jpg"));
    assert_eq!(std::fs::read(&saved).unwrap(), b"jpeg bytes");
}

#[actix_rt::test]
async fn folder_qualified_public_ids_stay_in_the_download_dir() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/img"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1, 2, 3]))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let downloader = ImageDownloader::new(reqwest::Client::new(), dir.path());

    let saved = downloader
        .download(&format!("{}/img", server.uri()), Some("gallery/abc123"))
        .await
        .unwrap();

    assert_eq!(saved.parent().unwrap(), dir.path());
    assert!(saved.ends_with("gallery_abc123.jpg"));
}

#[actix_rt::test]
async fn failed_fetch_is_a_download_error_and_writes_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing.jpg"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let downloader = ImageDownloader::new(reqwest::Client::new(), dir.path().join("Download"));

    let err = downloader
        .download(&format!("{}/missing.jpg", server.uri()), Some("missing"))
        .await
        .unwrap_err();

    assert!(matches!(err, GalleryError::Download(_)));
    assert!(!dir.path().join("Download").exists());
}
