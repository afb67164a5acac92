//! Upload API endpoints
//!
//! - POST /api/v1/upload - Store an image (session required)
//! - POST /api/v1/upload/signature - Sign a direct browser upload (session required)

use axum::{
    extract::{Multipart, State},
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};

use crate::api::middleware::{require_session, ApiError, AppState};
use crate::services::media::{MediaServiceError, StoredMedia, UploadSignature};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(upload_file))
        .route("/signature", post(upload_signature))
}

fn map_error(e: MediaServiceError) -> ApiError {
    match e {
        MediaServiceError::InvalidType(t) => {
            ApiError::validation_error(format!("Unsupported file type: {}", t))
        }
        MediaServiceError::TooLarge { size, max } => {
            ApiError::validation_error(format!("File too large: {} bytes (max {})", size, max))
        }
        MediaServiceError::NotConfigured => {
            ApiError::upstream_error("Media host is not configured")
        }
        MediaServiceError::UploadFailed(msg) => {
            tracing::warn!("Media host upload failed: {}", msg);
            ApiError::upstream_error("Media host upload failed")
        }
        MediaServiceError::Storage(e) => {
            tracing::error!("Failed to store upload: {}", e);
            ApiError::internal_error("Failed to store file")
        }
    }
}

/// POST /api/v1/upload - Store an uploaded image.
///
/// Expects a multipart form with a `file` field. Answers 201 with the
/// public URL of the stored file.
async fn upload_file(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<StoredMedia>), ApiError> {
    require_session(&state, &headers)?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation_error(format!("Invalid multipart data: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or("upload").to_string();
        let content_type = field.content_type().unwrap_or("").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::validation_error(format!("Failed to read file: {}", e)))?;

        let stored = state
            .media_service
            .store(&filename, &content_type, data.to_vec())
            .await
            .map_err(map_error)?;

        return Ok((StatusCode::CREATED, Json(stored)));
    }

    Err(ApiError::validation_error("No file field in request"))
}

/// POST /api/v1/upload/signature - Sign a direct browser upload.
async fn upload_signature(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<UploadSignature>, ApiError> {
    require_session(&state, &headers)?;

    let signature = state.media_service.signature().map_err(map_error)?;
    Ok(Json(signature))
}

#[cfg(test)]
mod tests {
    use crate::api;
    use crate::api::middleware::testing::test_state;
    use axum::http::{header, HeaderValue, StatusCode};
    use axum_test::{
        multipart::{MultipartForm, Part},
        TestServer,
    };
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

    fn png_form() -> MultipartForm {
        let part = Part::bytes(vec![1, 2, 3])
            .file_name("photo.png")
            .mime_type("image/png");
        MultipartForm::new().add_part("file", part)
    }

    #[tokio::test]
    async fn test_upload_requires_session() {
        let server = test_server().await;

        let response = server.post("/api/v1/upload").multipart(png_form()).await;
        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_signature_requires_session() {
        let server = test_server().await;

        server
            .post("/api/v1/upload/signature")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_signature_unconfigured_is_bad_gateway() {
        let server = test_server().await;
        let cookie = session_cookie(&server).await;

        // The test state uses the default local media config with no
        // cloud credentials.
        let response = server
            .post("/api/v1/upload/signature")
            .add_header(header::COOKIE, HeaderValue::from_str(&cookie).unwrap())
            .await;
        response.assert_status(StatusCode::BAD_GATEWAY);
        let body: serde_json::Value = response.json();
        assert_eq!(body["error"]["code"], "UPSTREAM_ERROR");
    }

    #[tokio::test]
    async fn test_upload_rejects_wrong_type() {
        let server = test_server().await;
        let cookie = session_cookie(&server).await;

        let part = Part::bytes(vec![1, 2, 3])
            .file_name("doc.pdf")
            .mime_type("application/pdf");
        let form = MultipartForm::new().add_part("file", part);

        let response = server
            .post("/api/v1/upload")
            .add_header(header::COOKIE, HeaderValue::from_str(&cookie).unwrap())
            .multipart(form)
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
