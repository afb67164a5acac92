//! API module
//!
//! HTTP layer of the portfolio server:
//! - Public content endpoints under /api/v1
//! - Auth endpoints and session-guarded mutations
//! - Admin page shells behind the redirect middleware
//! - Uploaded file serving

pub mod auth;
pub mod experiences;
pub mod middleware;
pub mod pages;
pub mod posts;
pub mod projects;
pub mod skills;
pub mod tags;
pub mod techs;
pub mod upload;

pub use middleware::{ApiError, AppState};

use axum::{
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    Router,
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

/// Build the /api/v1 router
pub fn build_api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/projects", projects::router())
        .nest("/posts", posts::router())
        .nest("/experiences", experiences::router())
        .nest("/skills", skills::router())
        .nest("/tags", tags::router())
        .nest("/techs", techs::router())
        .nest("/upload", upload::router())
}

/// Build the complete router with middleware
pub fn build_router(state: AppState, cors_origin: &str) -> Router {
    // CORS must allow credentials so the session cookie travels with
    // cross-origin frontend requests
    let cors = CorsLayer::new()
        .allow_origin(
            cors_origin
                .parse::<HeaderValue>()
                .unwrap_or_else(|_| HeaderValue::from_static("http://localhost:3000")),
        )
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::COOKIE])
        .allow_credentials(true);

    // Admin pages sit behind the navigation guard; the guard only
    // redirects, the handlers re-verify the session themselves
    let admin_pages = pages::router().layer(axum_middleware::from_fn_with_state(
        state.clone(),
        middleware::admin_guard,
    ));

    Router::new()
        .nest("/api/v1", build_api_router())
        .merge(admin_pages)
        .nest_service(
            "/uploads",
            ServeDir::new(state.upload_config.path.clone()),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
