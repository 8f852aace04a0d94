use crate::handlers::login_handler;
use actix_web::web;

pub fn login_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/login")
            .route(web::get().to(login_handler::login_page))
            .route(web::post().to(login_handler::login)),
    )
    .service(
        web::resource("/logout")
            .route(web::get().to(login_handler::logout_page))
            .route(web::post().to(login_handler::logout)),
    );
}
