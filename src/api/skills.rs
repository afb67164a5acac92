//! Skill API endpoints
//!
//! - GET /api/v1/skills - List skills grouped by category order (public)
//! - POST /api/v1/skills - Create a skill (session required)
//! - PUT /api/v1/skills/{id} - Update a skill (session required)
//! - DELETE /api/v1/skills/{id} - Delete a skill (session required)

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};

use crate::api::middleware::{require_session, ApiError, AppState};
use crate::models::{CreateSkill, Skill, UpdateSkill};
use crate::services::skill::SkillServiceError;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_skills).post(create_skill))
        .route("/{id}", get(get_skill).put(update_skill).delete(delete_skill))
}

fn map_error(e: SkillServiceError) -> ApiError {
    match e {
        SkillServiceError::NotFound(id) => ApiError::not_found(format!("Skill {}", id)),
        SkillServiceError::Duplicate { name, category } => ApiError::validation_error(format!(
            "Skill '{}' already exists in category '{}'",
            name, category
        )),
        SkillServiceError::ValidationError(msg) => ApiError::validation_error(msg),
        SkillServiceError::InternalError(e) => {
            tracing::error!("Skill operation failed: {:#}", e);
            ApiError::internal_error("Internal error")
        }
    }
}

async fn list_skills(State(state): State<AppState>) -> Result<Json<Vec<Skill>>, ApiError> {
    let skills = state.skill_service.list().await.map_err(map_error)?;
    Ok(Json(skills))
}

async fn get_skill(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Skill>, ApiError> {
    let skill = state.skill_service.get(id).await.map_err(map_error)?;
    Ok(Json(skill))
}

async fn create_skill(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<CreateSkill>,
) -> Result<(StatusCode, Json<Skill>), ApiError> {
    require_session(&state, &headers)?;

    let created = state.skill_service.create(body).await.map_err(map_error)?;

    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_skill(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<UpdateSkill>,
) -> Result<Json<Skill>, ApiError> {
    require_session(&state, &headers)?;

    let updated = state
        .skill_service
        .update(id, body)
        .await
        .map_err(map_error)?;

    Ok(Json(updated))
}

async fn delete_skill(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    require_session(&state, &headers)?;

    state.skill_service.delete(id).await.map_err(map_error)?;

    Ok(StatusCode::NO_CONTENT)
}
