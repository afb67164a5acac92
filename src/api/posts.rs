//! Post API endpoints
//!
//! - GET /api/v1/posts - List posts (public; drafts only with a session)
//! - GET /api/v1/posts/{id} - Get a post
//! - GET /api/v1/posts/slug/{slug} - Get a post by slug
//! - POST /api/v1/posts - Create a post (session required)
//! - PUT /api/v1/posts/{id} - Update a post (session required)
//! - DELETE /api/v1/posts/{id} - Delete a post (session required)

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};

use crate::api::middleware::{require_session, ApiError, AppState};
use crate::models::{CreatePost, PostWithTags, UpdatePost};
use crate::services::post::PostServiceError;

/// Build the posts router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_posts).post(create_post))
        .route("/slug/{slug}", get(get_post_by_slug))
        .route("/{id}", get(get_post).put(update_post).delete(delete_post))
}

fn map_error(e: PostServiceError) -> ApiError {
    match e {
        PostServiceError::NotFound(id) => ApiError::not_found(format!("Post {}", id)),
        PostServiceError::SlugTaken(slug) => {
            ApiError::slug_taken(format!("Slug already in use: {}", slug))
        }
        PostServiceError::ValidationError(msg) => ApiError::validation_error(msg),
        PostServiceError::InternalError(e) => {
            tracing::error!("Post operation failed: {:#}", e);
            ApiError::internal_error("Internal error")
        }
    }
}

/// GET /api/v1/posts - List posts
async fn list_posts(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<PostWithTags>>, ApiError> {
    let is_admin = require_session(&state, &headers).is_ok();

    let posts = state.post_service.list(!is_admin).await.map_err(map_error)?;

    Ok(Json(posts))
}

/// GET /api/v1/posts/{id} - Get a post
async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<PostWithTags>, ApiError> {
    let post = state.post_service.get(id).await.map_err(map_error)?;
    Ok(Json(post))
}

/// GET /api/v1/posts/slug/{slug} - Get a post by slug
///
/// Drafts resolve only for an authenticated session; anonymous readers
/// get a 404 for an unpublished slug.
async fn get_post_by_slug(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(slug): Path<String>,
) -> Result<Json<PostWithTags>, ApiError> {
    let found = state
        .post_service
        .get_by_slug(&slug)
        .await
        .map_err(map_error)?;

    let is_admin = require_session(&state, &headers).is_ok();

    match found {
        Some(post) if post.post.published || is_admin => Ok(Json(post)),
        _ => Err(ApiError::not_found(format!("Post '{}'", slug))),
    }
}

/// POST /api/v1/posts - Create a post
async fn create_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<CreatePost>,
) -> Result<(StatusCode, Json<PostWithTags>), ApiError> {
    require_session(&state, &headers)?;

    let created = state.post_service.create(body).await.map_err(map_error)?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/v1/posts/{id} - Update a post
async fn update_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<UpdatePost>,
) -> Result<Json<PostWithTags>, ApiError> {
    require_session(&state, &headers)?;

    let updated = state
        .post_service
        .update(id, body)
        .await
        .map_err(map_error)?;

    Ok(Json(updated))
}

/// DELETE /api/v1/posts/{id} - Delete a post
async fn delete_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    require_session(&state, &headers)?;

    state.post_service.delete(id).await.map_err(map_error)?;

    Ok(StatusCode::NO_CONTENT)
}
