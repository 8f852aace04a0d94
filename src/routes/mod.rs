use actix_web::web;

pub mod actuator;
pub mod login;
pub mod messages;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(messages::message_routes())
        .service(actuator::actuator_routes())
        .configure(login::login_routes);
}
