use actix_cors::Cors;
use actix_web::http::header::{self, HeaderName};
use log::warn;

pub const ALLOWED_METHODS: [&str; 5] = ["GET", "POST", "DELETE", "PUT", "PATCH"];

pub const ALLOWED_HEADERS: [HeaderName; 4] = [
    header::ORIGIN,
    header::CONTENT_TYPE,
    header::ACCEPT,
    header::AUTHORIZATION,
];

const MAX_AGE_SECS: usize = 1800;

/// Credentialed CORS restricted to the configured origins. With no origins
/// configured every cross-origin request is refused.
pub fn cors_policy(allowed_origins: &[String]) -> Cors {
    let cors = Cors::default()
        .allowed_methods(ALLOWED_METHODS)
        .allowed_headers(ALLOWED_HEADERS)
        .supports_credentials()
        .max_age(MAX_AGE_SECS);

    allowed_origins.iter().fold(cors, |cors, origin| {
        if origin == "*" {
            // Wildcards can't be combined with credentials.
            warn!("Ignoring wildcard CORS origin");
            cors
        } else {
            cors.allowed_origin(origin)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::routes;
    use actix_web::http::{Method, StatusCode};
    use actix_web::{test, web, App};

    const ORIGIN: &str = "http://localhost:4200";

    macro_rules! cors_app {
        ($origins:expr) => {{
            let config = Config::from_lookup(|key| match key {
                "SECURITY_USER_PASSWORD" => Some("secret".to_string()),
                _ => None,
            })
            .unwrap();
            let origins: &[&str] = $origins;
            let origins: Vec<String> = origins.iter().map(|o| o.to_string()).collect();
            test::init_service(
                App::new()
                    .app_data(web::Data::new(config))
                    .wrap(cors_policy(&origins))
                    .configure(routes::configure),
            )
            .await
        }};
    }

    fn preflight(origin: &str, method: &str) -> test::TestRequest {
        test::TestRequest::default()
            .method(Method::OPTIONS)
            .uri("/messages")
            .insert_header((header::ORIGIN, origin))
            .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, method))
    }

    #[actix_web::test]
    async fn preflight_from_allowed_origin_succeeds() {
        let app = cors_app!(&["https://fitverse.app", ORIGIN]);

        let resp = test::call_service(&app, preflight(ORIGIN, "GET").to_request()).await;
        assert!(resp.status().is_success());
        assert_eq!(
            resp.headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .unwrap(),
            ORIGIN
        );
        assert_eq!(
            resp.headers()
                .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
                .unwrap(),
            "true"
        );
    }

    #[actix_web::test]
    async fn simple_request_from_allowed_origin_is_annotated() {
        let app = cors_app!(&[ORIGIN]);

        let req = test::TestRequest::get()
            .uri("/messages")
            .insert_header((header::ORIGIN, ORIGIN))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .unwrap(),
            ORIGIN
        );
    }

    #[actix_web::test]
    async fn preflight_from_unknown_origin_is_rejected() {
        let app = cors_app!(&[ORIGIN]);

        let req = preflight("https://evil.example", "GET").to_request();
        match test::try_call_service(&app, req).await {
            Ok(resp) => {
                assert!(resp.status().is_client_error());
                assert!(resp
                    .headers()
                    .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                    .is_none());
            }
            Err(err) => assert!(err.as_response_error().status_code().is_client_error()),
        }
    }

    #[actix_web::test]
    async fn preflight_with_disallowed_method_is_rejected() {
        let app = cors_app!(&[ORIGIN]);

        match test::try_call_service(&app, preflight(ORIGIN, "TRACE").to_request()).await {
            Ok(resp) => assert!(resp.status().is_client_error()),
            Err(err) => assert!(err.as_response_error().status_code().is_client_error()),
        }
    }

    #[actix_web::test]
    async fn no_configured_origins_refuses_cross_origin_calls() {
        let app = cors_app!(&[]);

        match test::try_call_service(&app, preflight(ORIGIN, "GET").to_request()).await {
            Ok(resp) => assert!(resp.status().is_client_error()),
            Err(err) => assert!(err.as_response_error().status_code().is_client_error()),
        }
    }
}
