//! Skill service
//!
//! Business logic for skills. Skill names are unique within a category.

use crate::db::repositories::SkillRepository;
use crate::models::{CreateSkill, Skill, UpdateSkill};
use anyhow::Context;
use chrono::Utc;
use std::sync::Arc;

/// Error types for skill service operations
#[derive(Debug, thiserror::Error)]
pub enum SkillServiceError {
    /// Skill not found
    #[error("Skill not found: {0}")]
    NotFound(i64),

    /// A skill with this name already exists in the category
    #[error("Skill '{name}' already exists in category '{category}'")]
    Duplicate { name: String, category: String },

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Skill service for managing the skills grid
pub struct SkillService {
    repo: Arc<dyn SkillRepository>,
}

impl SkillService {
    /// Create a new skill service
    pub fn new(repo: Arc<dyn SkillRepository>) -> Self {
        Self { repo }
    }

    /// List all skills ordered by category, sort order, then name
    pub async fn list(&self) -> Result<Vec<Skill>, SkillServiceError> {
        self.repo
            .list()
            .await
            .context("Failed to list skills")
            .map_err(Into::into)
    }

    /// Get a skill by ID
    pub async fn get(&self, id: i64) -> Result<Skill, SkillServiceError> {
        self.repo
            .get_by_id(id)
            .await
            .context("Failed to get skill")?
            .ok_or(SkillServiceError::NotFound(id))
    }

    /// Create a new skill
    pub async fn create(&self, input: CreateSkill) -> Result<Skill, SkillServiceError> {
        let name = input.name.trim().to_string();
        let category = input.category.trim().to_string();
        if name.is_empty() {
            return Err(SkillServiceError::ValidationError(
                "Name cannot be empty".to_string(),
            ));
        }
        if category.is_empty() {
            return Err(SkillServiceError::ValidationError(
                "Category cannot be empty".to_string(),
            ));
        }

        if self
            .repo
            .get_by_name_and_category(&name, &category)
            .await
            .context("Failed to check existing skill")?
            .is_some()
        {
            return Err(SkillServiceError::Duplicate { name, category });
        }

        let skill = Skill {
            id: 0,
            name,
            category,
            icon_url: input.icon_url,
            sort_order: input.sort_order,
            created_at: Utc::now(),
        };

        self.repo
            .create(&skill)
            .await
            .context("Failed to create skill")
            .map_err(Into::into)
    }

    /// Update a skill. Absent fields are left unchanged.
    pub async fn update(&self, id: i64, input: UpdateSkill) -> Result<Skill, SkillServiceError> {
        let mut skill = self
            .repo
            .get_by_id(id)
            .await
            .context("Failed to get skill")?
            .ok_or(SkillServiceError::NotFound(id))?;

        if let Some(name) = input.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(SkillServiceError::ValidationError(
                    "Name cannot be empty".to_string(),
                ));
            }
            skill.name = name;
        }
        if let Some(category) = input.category {
            let category = category.trim().to_string();
            if category.is_empty() {
                return Err(SkillServiceError::ValidationError(
                    "Category cannot be empty".to_string(),
                ));
            }
            skill.category = category;
        }
        if let Some(icon_url) = input.icon_url {
            skill.icon_url = icon_url;
        }
        if let Some(sort_order) = input.sort_order {
            skill.sort_order = sort_order;
        }

        // The new (name, category) pair must not collide with another row
        if let Some(existing) = self
            .repo
            .get_by_name_and_category(&skill.name, &skill.category)
            .await
            .context("Failed to check existing skill")?
        {
            if existing.id != id {
                return Err(SkillServiceError::Duplicate {
                    name: skill.name,
                    category: skill.category,
                });
            }
        }

        self.repo
            .update(&skill)
            .await
            .context("Failed to update skill")
            .map_err(Into::into)
    }

    /// Delete a skill by ID
    pub async fn delete(&self, id: i64) -> Result<(), SkillServiceError> {
        let removed = self
            .repo
            .delete(id)
            .await
            .context("Failed to delete skill")?;
        if !removed {
            return Err(SkillServiceError::NotFound(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::SqlxSkillRepository;
    use crate::db::{create_test_pool, migrations};

    async fn setup_service() -> SkillService {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        SkillService::new(SqlxSkillRepository::boxed(pool))
    }

    fn create_input(name: &str, category: &str) -> CreateSkill {
        CreateSkill {
            name: name.to_string(),
            category: category.to_string(),
            icon_url: None,
            sort_order: 0,
        }
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let service = setup_service().await;

        service.create(create_input("Rust", "backend")).await.unwrap();
        service.create(create_input("React", "frontend")).await.unwrap();

        let skills = service.list().await.unwrap();
        assert_eq!(skills.len(), 2);
        assert_eq!(skills[0].name, "Rust");
    }

    #[tokio::test]
    async fn test_duplicate_in_category_rejected() {
        let service = setup_service().await;
        service.create(create_input("Rust", "backend")).await.unwrap();

        let result = service.create(create_input("Rust", "backend")).await;
        assert!(matches!(result, Err(SkillServiceError::Duplicate { .. })));
    }

    #[tokio::test]
    async fn test_same_name_other_category_allowed() {
        let service = setup_service().await;
        service.create(create_input("Testing", "backend")).await.unwrap();

        let result = service.create(create_input("Testing", "frontend")).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_update_collision_rejected() {
        let service = setup_service().await;
        service.create(create_input("Rust", "backend")).await.unwrap();
        let go = service.create(create_input("Go", "backend")).await.unwrap();

        let result = service
            .update(
                go.id,
                UpdateSkill {
                    name: Some("Rust".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(SkillServiceError::Duplicate { .. })));
    }

    #[tokio::test]
    async fn test_update_self_allowed() {
        let service = setup_service().await;
        let rust = service.create(create_input("Rust", "backend")).await.unwrap();

        // Updating other fields while keeping the same name/category is fine
        let updated = service
            .update(
                rust.id,
                UpdateSkill {
                    sort_order: Some(3),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.sort_order, 3);
    }

    #[tokio::test]
    async fn test_delete_missing_not_found() {
        let service = setup_service().await;

        let result = service.delete(404).await;
        assert!(matches!(result, Err(SkillServiceError::NotFound(404))));
    }
}
