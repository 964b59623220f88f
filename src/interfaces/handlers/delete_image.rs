use actix_web::{http::StatusCode, web, HttpResponse, Responder};

use crate::{entities::image::DeleteImageRequest, handlers::json_error::json_error, AppState};

/// `POST /delete-image`: deletes a blob on behalf of an unprivileged
/// caller. The public_id guard runs before the blob store is contacted.
pub async fn delete_image(
    state: web::Data<AppState>,
    body: web::Json<DeleteImageRequest>,
) -> impl Responder {
    let public_id = body.public_id.trim();
    if public_id.is_empty() {
        return json_error(
            StatusCode::BAD_REQUEST,
            "Missing public_id",
            "the request body must carry a non-empty public_id",
        );
    }

    match state.destroyer.destroy(public_id).await {
        // Pass-through: the caller sees the blob store's own payload.
        Ok(result) => HttpResponse::Ok().json(result),
        Err(e) => {
            tracing::error!(%public_id, error = %e, "blob deletion failed");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": e.detail()
            }))
        }
    }
}

pub async fn method_not_allowed() -> impl Responder {
    json_error(
        StatusCode::METHOD_NOT_ALLOWED,
        "Method not allowed",
        "only POST and OPTIONS are accepted",
    )
}
