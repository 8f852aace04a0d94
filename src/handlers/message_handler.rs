use crate::config::Config;
use crate::models::message::MessageResponse;
use actix_web::{web, HttpResponse, Responder};

pub async fn message_handler(config: web::Data<Config>) -> impl Responder {
    HttpResponse::Ok().json(MessageResponse::new(config.welcome_message.as_str()))
}
