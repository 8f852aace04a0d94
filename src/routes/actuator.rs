use crate::handlers::actuator_handler;
use actix_web::{web, Scope};

pub fn actuator_routes() -> Scope {
    web::scope("/actuator")
        .service(
            web::resource("")
                .route(web::get().to(actuator_handler::index_handler))
                .route(web::head().to(actuator_handler::index_handler)),
        )
        .service(
            web::resource("/health")
                .route(web::get().to(actuator_handler::health_handler))
                .route(web::head().to(actuator_handler::health_handler)),
        )
        .service(
            web::resource("/info")
                .route(web::get().to(actuator_handler::info_handler))
                .route(web::head().to(actuator_handler::info_handler)),
        )
}
