use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse
};
use derive_more::Display;

/// Failure kinds for the gallery flows. Each remote collaborator gets its
/// own variant so callers can tell which side of the protocol gave out.
#[derive(Debug, Clone, Display, PartialEq)]
pub enum GalleryError {
    #[display("Upload failed: {_0}")]
    Upload(String),

    #[display("Record store failure: {_0}")]
    Store(String),

    #[display("Blob deletion rejected: {_0}")]
    Delete(String),

    #[display("Deletion proxy failure: {_0}")]
    Proxy(String),

    #[display("Download failed: {_0}")]
    Download(String),
}

impl GalleryError {
    pub fn detail(&self) -> &str {
        match self {
            GalleryError::Upload(msg)
            | GalleryError::Store(msg)
            | GalleryError::Delete(msg)
            | GalleryError::Proxy(msg)
            | GalleryError::Download(msg) => msg,
        }
    }
}

impl ResponseError for GalleryError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .json(serde_json::json!({"error": self.to_string()}))
    }

    fn status_code(&self) -> StatusCode {
        // The proxy surfaces every upstream failure as a 500 carrying the
        // underlying message; nothing reaching here is the caller's fault.
        StatusCode::INTERNAL_SERVER_ERROR
    }
}
