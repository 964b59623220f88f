use actix_web::web;

use crate::handlers::{
    delete_image::{delete_image, method_not_allowed},
    home::home,
    system::health_check,
};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(home);
    cfg.service(health_check);

    // Explicit resource so anything other than POST (or the CORS preflight
    // handled upstream) gets the 405 the endpoint contract promises.
    cfg.service(
        web::resource("/delete-image")
            .route(web::post().to(delete_image))
            .default_service(web::route().to(method_not_allowed)),
    );
}
