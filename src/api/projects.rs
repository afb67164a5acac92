//! Project API endpoints
//!
//! - GET /api/v1/projects - List projects (public; drafts only with a session)
//! - GET /api/v1/projects/{id} - Get a project
//! - POST /api/v1/projects - Create a project (session required)
//! - PUT /api/v1/projects/{id} - Update a project (session required)
//! - DELETE /api/v1/projects/{id} - Delete a project (session required)

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};

use crate::api::middleware::{require_session, ApiError, AppState};
use crate::models::{CreateProject, ProjectWithTechs, UpdateProject};
use crate::services::project::ProjectServiceError;

/// Build the projects router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_projects).post(create_project))
        .route(
            "/{id}",
            get(get_project).put(update_project).delete(delete_project),
        )
}

fn map_error(e: ProjectServiceError) -> ApiError {
    match e {
        ProjectServiceError::NotFound(id) => ApiError::not_found(format!("Project {}", id)),
        ProjectServiceError::SlugTaken(slug) => {
            ApiError::slug_taken(format!("Slug already in use: {}", slug))
        }
        ProjectServiceError::ValidationError(msg) => ApiError::validation_error(msg),
        ProjectServiceError::InternalError(e) => {
            tracing::error!("Project operation failed: {:#}", e);
            ApiError::internal_error("Internal error")
        }
    }
}

/// GET /api/v1/projects - List projects
///
/// Public. Drafts are included only when the request carries a valid
/// session.
async fn list_projects(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<ProjectWithTechs>>, ApiError> {
    let is_admin = require_session(&state, &headers).is_ok();

    let projects = state
        .project_service
        .list(!is_admin)
        .await
        .map_err(map_error)?;

    Ok(Json(projects))
}

/// GET /api/v1/projects/{id} - Get a project
async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ProjectWithTechs>, ApiError> {
    let project = state.project_service.get(id).await.map_err(map_error)?;
    Ok(Json(project))
}

/// POST /api/v1/projects - Create a project
async fn create_project(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<CreateProject>,
) -> Result<(StatusCode, Json<ProjectWithTechs>), ApiError> {
    require_session(&state, &headers)?;

    let created = state
        .project_service
        .create(body)
        .await
        .map_err(map_error)?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/v1/projects/{id} - Update a project
async fn update_project(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<UpdateProject>,
) -> Result<Json<ProjectWithTechs>, ApiError> {
    require_session(&state, &headers)?;

    let updated = state
        .project_service
        .update(id, body)
        .await
        .map_err(map_error)?;

    Ok(Json(updated))
}

/// DELETE /api/v1/projects/{id} - Delete a project
async fn delete_project(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    require_session(&state, &headers)?;

    state.project_service.delete(id).await.map_err(map_error)?;

    Ok(StatusCode::NO_CONTENT)
}
