//! Tag API endpoints
//!
//! - GET /api/v1/tags - List all tags (public)
//! - POST /api/v1/tags - Create or reuse a tag by name (session required)
//! - DELETE /api/v1/tags/{id} - Delete a tag (session required)

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::api::middleware::{require_session, ApiError, AppState};
use crate::models::Tag;
use crate::services::tag::TagServiceError;

#[derive(Debug, Deserialize)]
pub struct CreateTagRequest {
    pub name: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tags).post(create_tag))
        .route("/{id}", axum::routing::delete(delete_tag))
}

fn map_error(e: TagServiceError) -> ApiError {
    match e {
        TagServiceError::NotFound(id) => ApiError::not_found(format!("Tag {}", id)),
        TagServiceError::ValidationError(msg) => ApiError::validation_error(msg),
        TagServiceError::InternalError(e) => {
            tracing::error!("Tag operation failed: {:#}", e);
            ApiError::internal_error("Internal error")
        }
    }
}

async fn list_tags(State(state): State<AppState>) -> Result<Json<Vec<Tag>>, ApiError> {
    let tags = state.tag_service.list().await.map_err(map_error)?;
    Ok(Json(tags))
}

/// POST /api/v1/tags - Create or reuse a tag.
///
/// A fresh tag answers 201; posting an existing name answers 200 with
/// the stored tag.
async fn create_tag(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<CreateTagRequest>,
) -> Result<(StatusCode, Json<Tag>), ApiError> {
    require_session(&state, &headers)?;

    let (tag, created) = state
        .tag_service
        .create_or_get(&body.name)
        .await
        .map_err(map_error)?;

    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(tag)))
}

async fn delete_tag(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    require_session(&state, &headers)?;

    state.tag_service.delete(id).await.map_err(map_error)?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use crate::api;
    use crate::api::middleware::testing::test_state;
    use axum::http::{header, HeaderValue, StatusCode};
    use axum_test::TestServer;
    use serde_json::json;

    async fn test_server() -> TestServer {
        let state = test_state().await;
        let app = api::build_router(state, "http://localhost:3000");
        TestServer::new(app).expect("Failed to build test server")
    }

    async fn session_cookie(server: &TestServer) -> String {
        let login = server
            .post("/api/v1/auth/login")
            .json(&json!({"email": "admin@example.com", "password": "hunter2"}))
            .await;
        let cookie = login.headers().get("set-cookie").unwrap().to_str().unwrap();
        cookie.split(';').next().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_create_then_reuse() {
        let server = test_server().await;
        let cookie = session_cookie(&server).await;

        let first = server
            .post("/api/v1/tags")
            .add_header(header::COOKIE, HeaderValue::from_str(&cookie).unwrap())
            .json(&json!({"name": "Web Dev"}))
            .await;
        first.assert_status(StatusCode::CREATED);
        let body: serde_json::Value = first.json();
        assert_eq!(body["slug"], "web-dev");

        let second = server
            .post("/api/v1/tags")
            .add_header(header::COOKIE, HeaderValue::from_str(&cookie).unwrap())
            .json(&json!({"name": "Web Dev"}))
            .await;
        second.assert_status_ok();
        let reused: serde_json::Value = second.json();
        assert_eq!(reused["id"], body["id"]);
    }

    #[tokio::test]
    async fn test_create_requires_session() {
        let server = test_server().await;

        server
            .post("/api/v1/tags")
            .json(&json!({"name": "Rust"}))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_empty_name_rejected() {
        let server = test_server().await;
        let cookie = session_cookie(&server).await;

        server
            .post("/api/v1/tags")
            .add_header(header::COOKIE, HeaderValue::from_str(&cookie).unwrap())
            .json(&json!({"name": "   "}))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}
