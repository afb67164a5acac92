//! Tech service
//!
//! Business logic for project technologies: create-or-reuse by name,
//! listing and deletion.

use crate::db::repositories::TechRepository;
use crate::models::Tech;
use anyhow::Context;
use std::sync::Arc;

/// Error types for tech service operations
#[derive(Debug, thiserror::Error)]
pub enum TechServiceError {
    /// Tech not found
    #[error("Tech not found: {0}")]
    NotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Tech service for managing project technologies
pub struct TechService {
    repo: Arc<dyn TechRepository>,
}

impl TechService {
    /// Create a new tech service
    pub fn new(repo: Arc<dyn TechRepository>) -> Self {
        Self { repo }
    }

    /// Create a new tech entry or reuse an existing one by name.
    ///
    /// Returns the tech and whether it was newly created.
    ///
    /// # Errors
    /// - `ValidationError` if the name is empty
    pub async fn create_or_get(&self, name: &str) -> Result<(Tech, bool), TechServiceError> {
        let trimmed_name = name.trim();
        if trimmed_name.is_empty() {
            return Err(TechServiceError::ValidationError(
                "Tech name cannot be empty".to_string(),
            ));
        }

        if let Some(existing) = self
            .repo
            .get_by_name(trimmed_name)
            .await
            .context("Failed to check existing tech")?
        {
            return Ok((existing, false));
        }

        let created = self
            .repo
            .create(&Tech::new(trimmed_name.to_string()))
            .await
            .context("Failed to create tech")?;

        Ok((created, true))
    }

    /// List all techs ordered by name
    pub async fn list(&self) -> Result<Vec<Tech>, TechServiceError> {
        self.repo
            .list()
            .await
            .context("Failed to list techs")
            .map_err(Into::into)
    }

    /// Delete a tech entry by ID
    pub async fn delete(&self, id: i64) -> Result<(), TechServiceError> {
        let existing = self
            .repo
            .get_by_id(id)
            .await
            .context("Failed to look up tech")?;
        if existing.is_none() {
            return Err(TechServiceError::NotFound(id.to_string()));
        }

        self.repo
            .delete(id)
            .await
            .context("Failed to delete tech")
            .map_err(Into::into)
    }
}
