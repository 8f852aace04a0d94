use crate::config::Config;
use crate::models::login::{LoginForm, LoginPageQuery, LogoutForm};
use crate::security::{SessionStore, SESSION_COOKIE};
use actix_web::cookie::{Cookie, SameSite};
use actix_web::http::header::{self, ContentType};
use actix_web::{web, HttpRequest, HttpResponse};
use log::{info, warn};
use serde_json::json;

pub async fn login_page(
    req: HttpRequest,
    query: web::Query<LoginPageQuery>,
    sessions: web::Data<SessionStore>,
) -> HttpResponse {
    let current = req.cookie(SESSION_COOKIE);
    let (id, token) = sessions.csrf_token(current.as_ref().map(|cookie| cookie.value()));

    let notice = if query.error.is_some() {
        r#"<div class="alert alert-danger">Bad credentials</div>"#
    } else if query.logout.is_some() {
        r#"<div class="alert alert-success">You have been signed out</div>"#
    } else {
        ""
    };

    HttpResponse::Ok()
        .cookie(session_cookie(&id))
        .content_type(ContentType::html())
        .body(format!(
            r#"<!DOCTYPE html>
<html lang="en">
  <head><meta charset="utf-8"><title>Please sign in</title></head>
  <body>
    <form method="post" action="/login">
      <h2>Please sign in</h2>
      {notice}
      <p><label for="username">Username</label>
        <input type="text" id="username" name="username" autocomplete="username" required autofocus></p>
      <p><label for="password">Password</label>
        <input type="password" id="password" name="password" autocomplete="current-password" required></p>
      <input name="_csrf" type="hidden" value="{token}">
      <button type="submit">Sign in</button>
    </form>
  </body>
</html>
"#
        ))
}

pub async fn login(
    req: HttpRequest,
    form: web::Form<LoginForm>,
    sessions: web::Data<SessionStore>,
    config: web::Data<Config>,
) -> HttpResponse {
    let current = req.cookie(SESSION_COOKIE);
    let current = current.as_ref().map(|cookie| cookie.value());

    let csrf_ok = current
        .and_then(|id| sessions.get(id))
        .is_some_and(|session| session.csrf_matches(form.csrf.as_deref()));
    if !csrf_ok {
        return invalid_csrf();
    }

    if !config.credentials.matches(&form.username, &form.password) {
        warn!("Failed login attempt for user {:?}", form.username);
        return redirect("/login?error");
    }

    let id = sessions.authenticate(current, &form.username);
    info!("User {:?} logged in", form.username);

    HttpResponse::Found()
        .insert_header((header::LOCATION, "/"))
        .cookie(session_cookie(&id))
        .finish()
}

pub async fn logout_page(req: HttpRequest, sessions: web::Data<SessionStore>) -> HttpResponse {
    let current = req.cookie(SESSION_COOKIE);
    let (id, token) = sessions.csrf_token(current.as_ref().map(|cookie| cookie.value()));

    HttpResponse::Ok()
        .cookie(session_cookie(&id))
        .content_type(ContentType::html())
        .body(format!(
            r#"<!DOCTYPE html>
<html lang="en">
  <head><meta charset="utf-8"><title>Confirm Log Out?</title></head>
  <body>
    <form method="post" action="/logout">
      <h2>Are you sure you want to log out?</h2>
      <input name="_csrf" type="hidden" value="{token}">
      <button type="submit">Log Out</button>
    </form>
  </body>
</html>
"#
        ))
}

pub async fn logout(
    req: HttpRequest,
    form: web::Form<LogoutForm>,
    sessions: web::Data<SessionStore>,
) -> HttpResponse {
    let Some(cookie) = req.cookie(SESSION_COOKIE) else {
        return invalid_csrf();
    };

    let csrf_ok = sessions
        .get(cookie.value())
        .is_some_and(|session| session.csrf_matches(form.csrf.as_deref()));
    if !csrf_ok {
        return invalid_csrf();
    }

    if let Some(username) = sessions.remove(cookie.value()).and_then(|s| s.username) {
        info!("User {:?} logged out", username);
    }

    let mut removal = session_cookie("");
    removal.make_removal();

    HttpResponse::Found()
        .insert_header((header::LOCATION, "/login?logout"))
        .cookie(removal)
        .finish()
}

fn session_cookie(id: &str) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, id.to_string())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .finish()
}

fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

fn invalid_csrf() -> HttpResponse {
    HttpResponse::Forbidden().json(json!({
        "error": "Forbidden",
        "details": "Invalid CSRF token"
    }))
}
