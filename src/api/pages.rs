//! Admin page shells
//!
//! Serves the HTML entry points for the admin panel. The single-page
//! frontend lives under `static/admin/` on disk; when it has not been
//! built yet a minimal built-in shell is served instead so the login
//! flow stays reachable. Navigation redirects between `/admin` and
//! `/admin/login` are handled by the admin guard middleware, and each
//! handler re-checks the session on top of that so a page is never
//! rendered for a token that went stale between the two checks.

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, StatusCode},
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use std::path::Path as FsPath;
use tokio::fs;

use crate::api::middleware::AppState;
use crate::services::auth::session_token;

const ADMIN_DIR: &str = "static/admin";

const FALLBACK_DASHBOARD: &str = r#"<!doctype html>
<html>
<head><meta charset="utf-8"><title>Admin</title></head>
<body><div id="app" data-page="dashboard"></div></body>
</html>"#;

const FALLBACK_LOGIN: &str = r#"<!doctype html>
<html>
<head><meta charset="utf-8"><title>Login</title></head>
<body><div id="app" data-page="login"></div></body>
</html>"#;

/// Build the admin pages router. The caller wraps this with the admin
/// guard middleware.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin", get(dashboard))
        .route("/admin/login", get(login_page))
        .route("/admin/{section}", get(section_page))
}

fn has_session(state: &AppState, request: &Request) -> bool {
    session_token(request.headers())
        .and_then(|token| state.auth_service.verify_token(&token))
        .is_some()
}

/// GET /admin - Admin dashboard shell
async fn dashboard(State(state): State<AppState>, request: Request) -> Response {
    if !has_session(&state, &request) {
        return Redirect::to("/admin/login").into_response();
    }
    serve_shell("index.html", FALLBACK_DASHBOARD).await
}

/// GET /admin/login - Login page shell
async fn login_page(State(state): State<AppState>, request: Request) -> Response {
    if has_session(&state, &request) {
        return Redirect::to("/admin").into_response();
    }
    serve_shell("login.html", FALLBACK_LOGIN).await
}

/// GET /admin/{section} - Section shells (projects, posts, and so on).
///
/// The frontend routes client-side, so every section serves the same
/// entry point.
async fn section_page(State(state): State<AppState>, request: Request) -> Response {
    if !has_session(&state, &request) {
        return Redirect::to("/admin/login").into_response();
    }
    serve_shell("index.html", FALLBACK_DASHBOARD).await
}

/// Serve a shell file from disk, falling back to the built-in page.
async fn serve_shell(file: &str, fallback: &str) -> Response {
    let path = FsPath::new(ADMIN_DIR).join(file);
    let body = match fs::read(&path).await {
        Ok(contents) => Body::from(contents),
        Err(_) => Body::from(fallback.to_string()),
    };

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/html; charset=utf-8")
        .header(header::CACHE_CONTROL, "no-cache")
        .body(body)
        // Static headers and a ready body cannot fail to assemble
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}
