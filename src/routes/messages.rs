use crate::handlers::message_handler;
use actix_web::{web, Scope};

pub fn message_routes() -> Scope {
    web::scope("/messages").service(
        web::resource("")
            .route(web::get().to(message_handler::message_handler))
            .route(web::head().to(message_handler::message_handler)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use actix_web::{http::StatusCode, test, App};

    macro_rules! message_app {
        () => {{
            let config = Config::from_lookup(|key| match key {
                "SECURITY_USER_PASSWORD" => Some("secret".to_string()),
                _ => None,
            })
            .unwrap();
            test::init_service(
                App::new()
                    .app_data(web::Data::new(config))
                    .service(message_routes()),
            )
            .await
        }};
    }

    #[actix_web::test]
    async fn head_is_answered_like_get() {
        let app = message_app!();

        let req = test::TestRequest::default()
            .method(actix_web::http::Method::HEAD)
            .uri("/messages")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn other_methods_are_not_allowed() {
        let app = message_app!();

        for req in [
            test::TestRequest::post().uri("/messages"),
            test::TestRequest::put().uri("/messages"),
            test::TestRequest::delete().uri("/messages"),
        ] {
            let resp = test::call_service(&app, req.to_request()).await;
            assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        }
    }
}
