use crate::config::{Config, Credentials};
use crate::security::policy::{is_normalized, AccessPolicy};
use crate::security::session::{SessionData, SessionStore, SESSION_COOKIE};
use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{self, HeaderMap};
use actix_web::http::{Method, StatusCode};
use actix_web::{web, Error, HttpResponse};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use futures::future::{ready, LocalBoxFuture, Ready};
use log::debug;
use serde_json::json;
use std::rc::Rc;

const REALM: &str = "Realm";

pub const CSRF_HEADER: &str = "X-CSRF-TOKEN";

/// Runs before routing, in this order:
/// 1. rejects paths that aren't normalised (400)
/// 2. rejects requests from origins that are neither allow-listed nor our own (403)
/// 3. lets public paths and the login endpoints through
/// 4. accepts HTTP Basic credentials, or a logged-in session whose unsafe
///    requests carry the session's CSRF token
/// 5. otherwise challenges: a redirect to the login form for browsers, a
///    Basic challenge for everyone else.
#[derive(Clone)]
pub struct SecurityFilter {
    state: Rc<FilterState>,
}

struct FilterState {
    policy: AccessPolicy,
    credentials: Credentials,
    allowed_origins: Vec<String>,
    sessions: web::Data<SessionStore>,
}

impl SecurityFilter {
    pub fn new(policy: AccessPolicy, config: &Config, sessions: web::Data<SessionStore>) -> Self {
        Self {
            state: Rc::new(FilterState {
                policy,
                credentials: config.credentials.clone(),
                allowed_origins: config.cors_origins.clone(),
                sessions,
            }),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for SecurityFilter
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = SecurityFilterMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SecurityFilterMiddleware {
            service,
            state: Rc::clone(&self.state),
        }))
    }
}

pub struct SecurityFilterMiddleware<S> {
    service: S,
    state: Rc<FilterState>,
}

impl<S, B> Service<ServiceRequest> for SecurityFilterMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        match self.state.check(&req) {
            Ok(()) => {
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
            Err(response) => {
                let response = req.into_response(response).map_into_right_body();
                Box::pin(ready(Ok(response)))
            }
        }
    }
}

impl FilterState {
    fn check(&self, req: &ServiceRequest) -> Result<(), HttpResponse> {
        let path = req.path();

        if !is_normalized(path) {
            debug!("Rejecting non-normalised path {}", path);
            return Err(error_response(
                StatusCode::BAD_REQUEST,
                "The request was rejected because the URL was not normalized",
            ));
        }

        if !self.origin_allowed(req) {
            debug!("Rejecting cross-origin request to {}", path);
            return Err(error_response(StatusCode::FORBIDDEN, "Invalid CORS request"));
        }

        if self.policy.is_public(path) || self.policy.is_login_path(path) {
            return Ok(());
        }

        if self.has_valid_basic(req.headers()) {
            return Ok(());
        }

        if let Some(session) = self.logged_in_session(req) {
            let token = req
                .headers()
                .get(CSRF_HEADER)
                .and_then(|value| value.to_str().ok());
            if requires_csrf(req.method()) && !session.csrf_matches(token) {
                debug!("Rejecting {} {} without a valid CSRF token", req.method(), path);
                return Err(error_response(StatusCode::FORBIDDEN, "Invalid CSRF token"));
            }
            return Ok(());
        }

        debug!("Rejecting unauthenticated request to {}", path);
        if accepts_html(req.headers()) {
            Err(HttpResponse::Found()
                .insert_header((header::LOCATION, "/login"))
                .finish())
        } else {
            Err(unauthorized())
        }
    }

    fn origin_allowed(&self, req: &ServiceRequest) -> bool {
        let Some(origin) = req.headers().get(header::ORIGIN) else {
            return true;
        };
        let Ok(origin) = origin.to_str() else {
            return false;
        };

        if self.allowed_origins.iter().any(|allowed| allowed == origin) {
            return true;
        }

        let info = req.connection_info();
        origin.eq_ignore_ascii_case(&format!("{}://{}", info.scheme(), info.host()))
    }

    fn has_valid_basic(&self, headers: &HeaderMap) -> bool {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_basic)
            .is_some_and(|(username, password)| self.credentials.matches(&username, &password))
    }

    fn logged_in_session(&self, req: &ServiceRequest) -> Option<SessionData> {
        let cookie = req.cookie(SESSION_COOKIE)?;
        self.sessions
            .get(cookie.value())
            .filter(|session| session.username.is_some())
    }
}

fn requires_csrf(method: &Method) -> bool {
    !method.is_safe()
}

fn accepts_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

/// Decodes `Basic <base64(username:password)>`.
fn parse_basic(value: &str) -> Option<(String, String)> {
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }

    let decoded = STANDARD.decode(token.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

fn error_response(status: StatusCode, details: &str) -> HttpResponse {
    HttpResponse::build(status).json(json!({
        "error": status.canonical_reason().unwrap_or_default(),
        "details": details
    }))
}

fn unauthorized() -> HttpResponse {
    HttpResponse::Unauthorized()
        .insert_header((
            header::WWW_AUTHENTICATE,
            format!("Basic realm=\"{}\"", REALM),
        ))
        .json(json!({
            "error": "Unauthorized",
            "details": "Full authentication is required to access this resource"
        }))
}
