use crate::models::actuator::{AppInfo, HealthResponse, InfoResponse, Link, LinksResponse};
use actix_web::{HttpResponse, Responder};
use std::collections::BTreeMap;

pub async fn index_handler() -> impl Responder {
    let links: BTreeMap<String, Link> = [
        ("self", "/actuator"),
        ("health", "/actuator/health"),
        ("info", "/actuator/info"),
    ]
    .into_iter()
    .map(|(name, href)| {
        (
            name.to_string(),
            Link {
                href: href.to_string(),
            },
        )
    })
    .collect();

    HttpResponse::Ok().json(LinksResponse { links })
}

/// Liveness only: if this answers, the process is serving requests.
pub async fn health_handler() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse::up())
}

pub async fn info_handler() -> impl Responder {
    HttpResponse::Ok().json(InfoResponse {
        app: AppInfo {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
    })
}
