use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use log::info;
use std::io;

mod config;
mod handlers;
mod models;
mod routes;
mod security;

use config::Config;
use security::{cors_policy, AccessPolicy, SecurityFilter, SessionStore};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    let bind_address = config.bind_address();

    info!(
        "Starting server on {} (CORS origins: {:?})",
        bind_address, config.cors_origins
    );

    let config = web::Data::new(config);
    let sessions = web::Data::new(SessionStore::default());

    HttpServer::new(move || {
        App::new()
            .app_data(config.clone())
            .app_data(sessions.clone())
            .wrap(SecurityFilter::new(
                AccessPolicy::default(),
                &config,
                sessions.clone(),
            ))
            .wrap(cors_policy(&config.cors_origins))
            .wrap(Logger::default())
            .configure(routes::configure)
    })
    .bind(bind_address)?
    .run()
    .await
}
