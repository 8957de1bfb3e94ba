use actix_web::web;
use log::debug;

use crate::error::GenerationError;
use crate::web::handlers;

pub fn configure(cfg: &mut web::ServiceConfig) {
    let json_config = web::JsonConfig::default().error_handler(|err, _req| {
        debug!("Rejected request body: {}", err);
        GenerationError::BadRequest("Invalid request body.".to_string()).into()
    });

    cfg.service(
        web::scope("/api")
            .app_data(json_config)
            .route("/generate", web::post().to(handlers::generate)),
    )
    .route("/", web::get().to(handlers::index))
    .route("/health", web::get().to(handlers::health_check));
}
