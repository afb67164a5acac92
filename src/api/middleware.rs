//! API middleware
//!
//! Shared application state, the JSON error envelope and both
//! authorization layers: the admin page redirect middleware and the
//! per-route session check used by every mutating API handler. Both go
//! through the same token verification; the page middleware is advisory
//! while the per-route check is what actually protects writes.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::models::Session;
use crate::services::auth::session_token;

/// Application state containing shared services
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<crate::services::AuthService>,
    pub project_service: Arc<crate::services::ProjectService>,
    pub post_service: Arc<crate::services::PostService>,
    pub experience_service: Arc<crate::services::ExperienceService>,
    pub skill_service: Arc<crate::services::SkillService>,
    pub tag_service: Arc<crate::services::TagService>,
    pub tech_service: Arc<crate::services::TechService>,
    pub media_service: Arc<crate::services::MediaService>,
    pub upload_config: Arc<crate::config::UploadConfig>,
}

/// Error response for API errors
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ApiErrorDetail {
                code: code.into(),
                message: message.into(),
                details: None,
            },
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new("UNAUTHORIZED", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("NOT_FOUND", message)
    }

    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    pub fn slug_taken(message: impl Into<String>) -> Self {
        Self::new("SLUG_TAKEN", message)
    }

    pub fn upstream_error(message: impl Into<String>) -> Self {
        Self::new("UPSTREAM_ERROR", message)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new("INTERNAL_ERROR", message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.error.code.as_str() {
            "UNAUTHORIZED" => StatusCode::UNAUTHORIZED,
            "NOT_FOUND" => StatusCode::NOT_FOUND,
            "VALIDATION_ERROR" | "SLUG_TAKEN" => StatusCode::BAD_REQUEST,
            "UPSTREAM_ERROR" => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(self)).into_response()
    }
}

/// Per-route session check.
///
/// Every mutating API handler calls this before touching a service. Any
/// failure mode (no cookie, garbage token, bad signature, expiry) yields
/// the same generic 401.
pub fn require_session(state: &AppState, headers: &HeaderMap) -> Result<Session, ApiError> {
    session_token(headers)
        .and_then(|token| state.auth_service.verify_token(&token))
        .ok_or_else(|| ApiError::unauthorized("Authentication required"))
}

/// Admin page middleware.
///
/// Redirects unauthenticated requests for admin pages to the login page,
/// and authenticated requests for the login page back to the dashboard.
/// Everything else passes through. This guards navigation only; the API
/// handlers re-check the session themselves.
pub async fn admin_guard(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let path = request.uri().path();
    let is_login_path = path == "/admin/login" || path.starts_with("/admin/login/");

    let is_authenticated = session_token(request.headers())
        .and_then(|token| state.auth_service.verify_token(&token))
        .is_some();

    if !is_authenticated && !is_login_path {
        return Redirect::to("/admin/login").into_response();
    }
    if is_authenticated && is_login_path {
        return Redirect::to("/admin").into_response();
    }

    next.run(request).await
}
