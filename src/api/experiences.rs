//! Experience API endpoints
//!
//! - GET /api/v1/experiences - List work history (public)
//! - GET /api/v1/experiences/{id} - Get an entry
//! - POST /api/v1/experiences - Create an entry (session required)
//! - PUT /api/v1/experiences/{id} - Update an entry (session required)
//! - DELETE /api/v1/experiences/{id} - Delete an entry (session required)

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};

use crate::api::middleware::{require_session, ApiError, AppState};
use crate::models::{CreateExperience, Experience, UpdateExperience};
use crate::services::experience::ExperienceServiceError;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_experiences).post(create_experience))
        .route(
            "/{id}",
            get(get_experience)
                .put(update_experience)
                .delete(delete_experience),
        )
}

fn map_error(e: ExperienceServiceError) -> ApiError {
    match e {
        ExperienceServiceError::NotFound(id) => {
            ApiError::not_found(format!("Experience {}", id))
        }
        ExperienceServiceError::ValidationError(msg) => ApiError::validation_error(msg),
        ExperienceServiceError::InternalError(e) => {
            tracing::error!("Experience operation failed: {:#}", e);
            ApiError::internal_error("Internal error")
        }
    }
}

async fn list_experiences(
    State(state): State<AppState>,
) -> Result<Json<Vec<Experience>>, ApiError> {
    let experiences = state.experience_service.list().await.map_err(map_error)?;
    Ok(Json(experiences))
}

async fn get_experience(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Experience>, ApiError> {
    let experience = state.experience_service.get(id).await.map_err(map_error)?;
    Ok(Json(experience))
}

async fn create_experience(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<CreateExperience>,
) -> Result<(StatusCode, Json<Experience>), ApiError> {
    require_session(&state, &headers)?;

    let created = state
        .experience_service
        .create(body)
        .await
        .map_err(map_error)?;

    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_experience(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<UpdateExperience>,
) -> Result<Json<Experience>, ApiError> {
    require_session(&state, &headers)?;

    let updated = state
        .experience_service
        .update(id, body)
        .await
        .map_err(map_error)?;

    Ok(Json(updated))
}

async fn delete_experience(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    require_session(&state, &headers)?;

    state
        .experience_service
        .delete(id)
        .await
        .map_err(map_error)?;

    Ok(StatusCode::NO_CONTENT)
}
