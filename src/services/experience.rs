//! Experience service
//!
//! Business logic for work experience entries. A current position carries
//! no end date; marking an entry current clears any stored end date.

use crate::db::repositories::ExperienceRepository;
use crate::models::{CreateExperience, Experience, UpdateExperience};
use anyhow::Context;
use chrono::Utc;
use std::sync::Arc;

/// Error types for experience service operations
#[derive(Debug, thiserror::Error)]
pub enum ExperienceServiceError {
    /// Experience not found
    #[error("Experience not found: {0}")]
    NotFound(i64),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Experience service for managing work history
pub struct ExperienceService {
    repo: Arc<dyn ExperienceRepository>,
}

impl ExperienceService {
    /// Create a new experience service
    pub fn new(repo: Arc<dyn ExperienceRepository>) -> Self {
        Self { repo }
    }

    /// List all experiences, current positions first, then most recent
    pub async fn list(&self) -> Result<Vec<Experience>, ExperienceServiceError> {
        self.repo
            .list()
            .await
            .context("Failed to list experiences")
            .map_err(Into::into)
    }

    /// Get an experience by ID
    pub async fn get(&self, id: i64) -> Result<Experience, ExperienceServiceError> {
        self.repo
            .get_by_id(id)
            .await
            .context("Failed to get experience")?
            .ok_or(ExperienceServiceError::NotFound(id))
    }

    /// Create a new experience entry
    pub async fn create(
        &self,
        input: CreateExperience,
    ) -> Result<Experience, ExperienceServiceError> {
        let company = input.company.trim().to_string();
        let role = input.role.trim().to_string();
        if company.is_empty() {
            return Err(ExperienceServiceError::ValidationError(
                "Company cannot be empty".to_string(),
            ));
        }
        if role.is_empty() {
            return Err(ExperienceServiceError::ValidationError(
                "Role cannot be empty".to_string(),
            ));
        }
        if let Some(end) = input.end_date {
            if end < input.start_date {
                return Err(ExperienceServiceError::ValidationError(
                    "End date cannot precede start date".to_string(),
                ));
            }
        }

        let now = Utc::now();
        let experience = Experience {
            id: 0,
            company,
            role,
            description: input.description,
            logo_url: input.logo_url,
            start_date: input.start_date,
            // A current position has no end date
            end_date: if input.current { None } else { input.end_date },
            current: input.current,
            sort_order: input.sort_order,
            created_at: now,
            updated_at: now,
        };

        self.repo
            .create(&experience)
            .await
            .context("Failed to create experience")
            .map_err(Into::into)
    }

    /// Update an experience entry. Absent fields are left unchanged.
    pub async fn update(
        &self,
        id: i64,
        input: UpdateExperience,
    ) -> Result<Experience, ExperienceServiceError> {
        let mut experience = self
            .repo
            .get_by_id(id)
            .await
            .context("Failed to get experience")?
            .ok_or(ExperienceServiceError::NotFound(id))?;

        if let Some(company) = input.company {
            let company = company.trim().to_string();
            if company.is_empty() {
                return Err(ExperienceServiceError::ValidationError(
                    "Company cannot be empty".to_string(),
                ));
            }
            experience.company = company;
        }
        if let Some(role) = input.role {
            let role = role.trim().to_string();
            if role.is_empty() {
                return Err(ExperienceServiceError::ValidationError(
                    "Role cannot be empty".to_string(),
                ));
            }
            experience.role = role;
        }
        if let Some(description) = input.description {
            experience.description = description;
        }
        if let Some(logo_url) = input.logo_url {
            experience.logo_url = logo_url;
        }
        if let Some(start_date) = input.start_date {
            experience.start_date = start_date;
        }
        if let Some(end_date) = input.end_date {
            experience.end_date = end_date;
        }
        if let Some(current) = input.current {
            experience.current = current;
            if current {
                experience.end_date = None;
            }
        }

        if let Some(end) = experience.end_date {
            if end < experience.start_date {
                return Err(ExperienceServiceError::ValidationError(
                    "End date cannot precede start date".to_string(),
                ));
            }
        }

        self.repo
            .update(&experience)
            .await
            .context("Failed to update experience")
            .map_err(Into::into)
    }

    /// Delete an experience entry by ID
    pub async fn delete(&self, id: i64) -> Result<(), ExperienceServiceError> {
        let removed = self
            .repo
            .delete(id)
            .await
            .context("Failed to delete experience")?;
        if !removed {
            return Err(ExperienceServiceError::NotFound(id));
        }
        Ok(())
    }
}
