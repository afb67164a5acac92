//! Tech API endpoints
//!
//! - GET /api/v1/techs - List all techs (public)
//! - POST /api/v1/techs - Create or reuse a tech by name (session required)
//! - DELETE /api/v1/techs/{id} - Delete a tech (session required)

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::api::middleware::{require_session, ApiError, AppState};
use crate::models::Tech;
use crate::services::tech::TechServiceError;

#[derive(Debug, Deserialize)]
pub struct CreateTechRequest {
    pub name: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_techs).post(create_tech))
        .route("/{id}", axum::routing::delete(delete_tech))
}

fn map_error(e: TechServiceError) -> ApiError {
    match e {
        TechServiceError::NotFound(id) => ApiError::not_found(format!("Tech {}", id)),
        TechServiceError::ValidationError(msg) => ApiError::validation_error(msg),
        TechServiceError::InternalError(e) => {
            tracing::error!("Tech operation failed: {:#}", e);
            ApiError::internal_error("Internal error")
        }
    }
}

async fn list_techs(State(state): State<AppState>) -> Result<Json<Vec<Tech>>, ApiError> {
    let techs = state.tech_service.list().await.map_err(map_error)?;
    Ok(Json(techs))
}

/// POST /api/v1/techs - Create or reuse a tech. 201 when new, 200 when reused.
async fn create_tech(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<CreateTechRequest>,
) -> Result<(StatusCode, Json<Tech>), ApiError> {
    require_session(&state, &headers)?;

    let (tech, created) = state
        .tech_service
        .create_or_get(&body.name)
        .await
        .map_err(map_error)?;

    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(tech)))
}

async fn delete_tech(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    require_session(&state, &headers)?;

    state.tech_service.delete(id).await.map_err(map_error)?;

    Ok(StatusCode::NO_CONTENT)
}
