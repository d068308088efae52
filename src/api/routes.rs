// API route configuration

use crate::api::handlers;
use actix_web::web;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg
        // Health check
        .route("/health", web::get().to(handlers::health_check))
        .route("/", web::get().to(handlers::health_check))
        // One endpoint per statistics domain
        .service(
            web::scope("/api/v1")
                .route("/production", web::get().to(handlers::production))
                .route("/processing", web::get().to(handlers::processing))
                .route(
                    "/commercialization",
                    web::get().to(handlers::commercialization),
                )
                .route("/import", web::get().to(handlers::import))
                .route("/export", web::get().to(handlers::export)),
        );
}
