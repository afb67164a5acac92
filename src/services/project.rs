//! Project service
//!
//! Business logic for portfolio projects: slug uniqueness, tech stack
//! replacement and draft filtering for the public listing.

use crate::db::repositories::ProjectRepository;
use crate::models::{CreateProject, Project, ProjectWithTechs, UpdateProject};
use anyhow::Context;
use chrono::Utc;
use std::sync::Arc;

/// Error types for project service operations
#[derive(Debug, thiserror::Error)]
pub enum ProjectServiceError {
    /// Project not found
    #[error("Project not found: {0}")]
    NotFound(i64),

    /// Slug already in use by another project
    #[error("Slug already in use: {0}")]
    SlugTaken(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Project service for managing portfolio projects
pub struct ProjectService {
    repo: Arc<dyn ProjectRepository>,
}

impl ProjectService {
    /// Create a new project service
    pub fn new(repo: Arc<dyn ProjectRepository>) -> Self {
        Self { repo }
    }

    /// List projects with their tech stacks, featured first.
    /// When `published_only` is set, drafts are excluded.
    pub async fn list(
        &self,
        published_only: bool,
    ) -> Result<Vec<ProjectWithTechs>, ProjectServiceError> {
        let projects = self
            .repo
            .list(published_only)
            .await
            .context("Failed to list projects")?;

        let mut result = Vec::with_capacity(projects.len());
        for project in projects {
            let techs = self
                .repo
                .get_techs(project.id)
                .await
                .context("Failed to load project techs")?;
            result.push(ProjectWithTechs { project, techs });
        }

        Ok(result)
    }

    /// Get a project by ID with its tech stack
    pub async fn get(&self, id: i64) -> Result<ProjectWithTechs, ProjectServiceError> {
        let project = self
            .repo
            .get_by_id(id)
            .await
            .context("Failed to get project")?
            .ok_or(ProjectServiceError::NotFound(id))?;

        let techs = self
            .repo
            .get_techs(project.id)
            .await
            .context("Failed to load project techs")?;

        Ok(ProjectWithTechs { project, techs })
    }

    /// Create a new project with its tech stack
    pub async fn create(
        &self,
        input: CreateProject,
    ) -> Result<ProjectWithTechs, ProjectServiceError> {
        let title = input.title.trim().to_string();
        let slug = input.slug.trim().to_string();
        if title.is_empty() {
            return Err(ProjectServiceError::ValidationError(
                "Title cannot be empty".to_string(),
            ));
        }
        if slug.is_empty() {
            return Err(ProjectServiceError::ValidationError(
                "Slug cannot be empty".to_string(),
            ));
        }

        if self
            .repo
            .get_by_slug(&slug)
            .await
            .context("Failed to check slug")?
            .is_some()
        {
            return Err(ProjectServiceError::SlugTaken(slug));
        }

        let now = Utc::now();
        let project = Project {
            id: 0,
            title,
            slug,
            description: input.description,
            thumbnail_url: input.thumbnail_url,
            live_url: input.live_url,
            github_url: input.github_url,
            featured: input.featured,
            published: input.published,
            sort_order: input.sort_order,
            created_at: now,
            updated_at: now,
        };

        let created = self
            .repo
            .create(&project)
            .await
            .context("Failed to create project")?;
        let techs = self
            .repo
            .replace_techs(created.id, &input.techs)
            .await
            .context("Failed to attach techs")?;

        Ok(ProjectWithTechs {
            project: created,
            techs,
        })
    }

    /// Update a project. Absent fields are left unchanged; a present tech
    /// list replaces the full stack.
    pub async fn update(
        &self,
        id: i64,
        input: UpdateProject,
    ) -> Result<ProjectWithTechs, ProjectServiceError> {
        let mut project = self
            .repo
            .get_by_id(id)
            .await
            .context("Failed to get project")?
            .ok_or(ProjectServiceError::NotFound(id))?;

        if let Some(slug) = &input.slug {
            let slug = slug.trim();
            if slug.is_empty() {
                return Err(ProjectServiceError::ValidationError(
                    "Slug cannot be empty".to_string(),
                ));
            }
            if slug != project.slug {
                if self
                    .repo
                    .get_by_slug(slug)
                    .await
                    .context("Failed to check slug")?
                    .is_some()
                {
                    return Err(ProjectServiceError::SlugTaken(slug.to_string()));
                }
                project.slug = slug.to_string();
            }
        }

        if let Some(title) = input.title {
            let title = title.trim().to_string();
            if title.is_empty() {
                return Err(ProjectServiceError::ValidationError(
                    "Title cannot be empty".to_string(),
                ));
            }
            project.title = title;
        }
        if let Some(description) = input.description {
            project.description = description;
        }
        if let Some(thumbnail_url) = input.thumbnail_url {
            project.thumbnail_url = thumbnail_url;
        }
        if let Some(live_url) = input.live_url {
            project.live_url = live_url;
        }
        if let Some(github_url) = input.github_url {
            project.github_url = github_url;
        }
        if let Some(featured) = input.featured {
            project.featured = featured;
        }
        if let Some(published) = input.published {
            project.published = published;
        }
        if let Some(sort_order) = input.sort_order {
            project.sort_order = sort_order;
        }

        let updated = self
            .repo
            .update(&project)
            .await
            .context("Failed to update project")?;

        let techs = match input.techs {
            Some(names) => self
                .repo
                .replace_techs(id, &names)
                .await
                .context("Failed to replace techs")?,
            None => self
                .repo
                .get_techs(id)
                .await
                .context("Failed to load project techs")?,
        };

        Ok(ProjectWithTechs {
            project: updated,
            techs,
        })
    }

    /// Delete a project by ID
    pub async fn delete(&self, id: i64) -> Result<(), ProjectServiceError> {
        let removed = self
            .repo
            .delete(id)
            .await
            .context("Failed to delete project")?;
        if !removed {
            return Err(ProjectServiceError::NotFound(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::SqlxProjectRepository;
    use crate::db::{create_test_pool, migrations};

    async fn setup_service() -> ProjectService {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        ProjectService::new(SqlxProjectRepository::boxed(pool))
    }

    fn create_input(slug: &str) -> CreateProject {
        CreateProject {
            title: format!("Title for {}", slug),
            slug: slug.to_string(),
            description: "desc".to_string(),
            thumbnail_url: None,
            live_url: None,
            github_url: None,
            featured: false,
            published: true,
            sort_order: 0,
            techs: vec!["Rust".to_string(), "Axum".to_string()],
        }
    }

    #[tokio::test]
    async fn test_create_with_techs() {
        let service = setup_service().await;

        let created = service.create(create_input("vitrine")).await.unwrap();

        assert!(created.project.id > 0);
        assert_eq!(created.techs.len(), 2);
    }

    #[tokio::test]
    async fn test_create_duplicate_slug_rejected() {
        let service = setup_service().await;
        service.create(create_input("dup")).await.unwrap();

        let result = service.create(create_input("dup")).await;
        assert!(matches!(result, Err(ProjectServiceError::SlugTaken(_))));
    }

    #[tokio::test]
    async fn test_create_empty_title_rejected() {
        let service = setup_service().await;
        let mut input = create_input("ok");
        input.title = "  ".to_string();

        let result = service.create(input).await;
        assert!(matches!(
            result,
            Err(ProjectServiceError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn test_update_partial() {
        let service = setup_service().await;
        let created = service.create(create_input("evolving")).await.unwrap();

        let updated = service
            .update(
                created.project.id,
                UpdateProject {
                    title: Some("Renamed".to_string()),
                    featured: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.project.title, "Renamed");
        assert!(updated.project.featured);
        // Untouched fields and tech stack survive
        assert_eq!(updated.project.slug, "evolving");
        assert_eq!(updated.techs.len(), 2);
    }

    #[tokio::test]
    async fn test_update_replaces_techs_when_present() {
        let service = setup_service().await;
        let created = service.create(create_input("stack")).await.unwrap();

        let updated = service
            .update(
                created.project.id,
                UpdateProject {
                    techs: Some(vec!["Svelte".to_string()]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.techs.len(), 1);
        assert_eq!(updated.techs[0].name, "Svelte");
    }

    #[tokio::test]
    async fn test_update_slug_conflict() {
        let service = setup_service().await;
        service.create(create_input("taken")).await.unwrap();
        let other = service.create(create_input("mine")).await.unwrap();

        let result = service
            .update(
                other.project.id,
                UpdateProject {
                    slug: Some("taken".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(ProjectServiceError::SlugTaken(_))));
    }

    #[tokio::test]
    async fn test_update_keeping_own_slug_allowed() {
        let service = setup_service().await;
        let created = service.create(create_input("mine")).await.unwrap();

        let result = service
            .update(
                created.project.id,
                UpdateProject {
                    slug: Some("mine".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_get_missing_not_found() {
        let service = setup_service().await;

        let result = service.get(404).await;
        assert!(matches!(result, Err(ProjectServiceError::NotFound(404))));
    }

    #[tokio::test]
    async fn test_delete() {
        let service = setup_service().await;
        let created = service.create(create_input("gone")).await.unwrap();

        service.delete(created.project.id).await.unwrap();

        let again = service.delete(created.project.id).await;
        assert!(matches!(again, Err(ProjectServiceError::NotFound(_))));
    }
}
