//! Authentication API endpoints
//!
//! Handles HTTP requests for admin authentication:
//! - POST /api/v1/auth/login - Admin login
//! - POST /api/v1/auth/logout - Admin logout
//! - GET /api/v1/auth/me - Get current session

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::api::middleware::{require_session, ApiError, AppState};
use crate::services::auth::{clear_cookie, set_cookie};

/// Request body for admin login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response for successful login/logout
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Response for the current session
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: MeUser,
}

#[derive(Debug, Serialize)]
pub struct MeUser {
    pub id: String,
    pub email: String,
}

/// Build the auth router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(me))
}

/// POST /api/v1/auth/login - Admin login
///
/// Verifies the submitted credential pair against the configured admin
/// account and sets the session cookie on success. Bad credentials and a
/// misconfigured server both yield the same generic 401 so the response
/// never reveals which side failed.
async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    if body.email.trim().is_empty() || body.password.is_empty() {
        return Err(ApiError::validation_error("Email and password are required"));
    }

    if !state.auth_service.verify_credentials(&body.email, &body.password) {
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    let issued = state.auth_service.issue_token(&body.email).map_err(|e| {
        tracing::warn!("Failed to issue session token: {}", e);
        ApiError::unauthorized("Invalid credentials")
    })?;

    let cookie = set_cookie(
        &issued.token,
        issued.expires_at,
        state.auth_service.secure_cookies(),
    );
    let cookie = HeaderValue::from_str(&cookie)
        .map_err(|_| ApiError::internal_error("Failed to build session cookie"))?;

    let mut response = Json(SuccessResponse { success: true }).into_response();
    response.headers_mut().insert(header::SET_COOKIE, cookie);

    Ok(response)
}

/// POST /api/v1/auth/logout - Admin logout
///
/// Clears the session cookie. Always succeeds, even without a session.
async fn logout(State(state): State<AppState>) -> Result<Response, ApiError> {
    let cookie = clear_cookie(state.auth_service.secure_cookies());
    let cookie = HeaderValue::from_str(&cookie)
        .map_err(|_| ApiError::internal_error("Failed to build session cookie"))?;

    let mut response = Json(SuccessResponse { success: true }).into_response();
    response.headers_mut().insert(header::SET_COOKIE, cookie);

    Ok(response)
}

/// GET /api/v1/auth/me - Current session info
async fn me(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<MeResponse>, ApiError> {
    let session = require_session(&state, &headers)?;

    Ok(Json(MeResponse {
        user: MeUser {
            id: session.subject,
            email: session.email,
        },
    }))
}
