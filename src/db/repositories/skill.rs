//! Skill repository
//!
//! Database operations for skills. The (name, category) pair is unique.

use crate::models::Skill;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

/// Skill repository trait
#[async_trait]
pub trait SkillRepository: Send + Sync {
    /// Create a new skill
    async fn create(&self, skill: &Skill) -> Result<Skill>;

    /// Get skill by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Skill>>;

    /// Get skill by name within a category
    async fn get_by_name_and_category(&self, name: &str, category: &str)
        -> Result<Option<Skill>>;

    /// List all skills ordered by category, sort order, then name
    async fn list(&self) -> Result<Vec<Skill>>;

    /// Update an existing skill (full row write)
    async fn update(&self, skill: &Skill) -> Result<Skill>;

    /// Delete a skill. Returns true when a row was removed.
    async fn delete(&self, id: i64) -> Result<bool>;
}

/// SQLx-based skill repository implementation
pub struct SqlxSkillRepository {
    pool: SqlitePool,
}

impl SqlxSkillRepository {
    /// Create a new SQLx skill repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn SkillRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl SkillRepository for SqlxSkillRepository {
    async fn create(&self, skill: &Skill) -> Result<Skill> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO skills (name, category, icon_url, sort_order, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&skill.name)
        .bind(&skill.category)
        .bind(&skill.icon_url)
        .bind(skill.sort_order)
        .bind(now)
        .execute(&self.pool)
        .await
        .context("Failed to create skill")?;

        Ok(Skill {
            id: result.last_insert_rowid(),
            name: skill.name.clone(),
            category: skill.category.clone(),
            icon_url: skill.icon_url.clone(),
            sort_order: skill.sort_order,
            created_at: now,
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Skill>> {
        let row = sqlx::query(
            "SELECT id, name, category, icon_url, sort_order, created_at FROM skills WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get skill by ID")?;

        row.map(|row| row_to_skill(&row)).transpose()
    }

    async fn get_by_name_and_category(
        &self,
        name: &str,
        category: &str,
    ) -> Result<Option<Skill>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, category, icon_url, sort_order, created_at
            FROM skills
            WHERE name = ? AND category = ?
            "#,
        )
        .bind(name)
        .bind(category)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get skill by name and category")?;

        row.map(|row| row_to_skill(&row)).transpose()
    }

    async fn list(&self) -> Result<Vec<Skill>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, category, icon_url, sort_order, created_at
            FROM skills
            ORDER BY category ASC, sort_order ASC, name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list skills")?;

        rows.iter().map(row_to_skill).collect()
    }

    async fn update(&self, skill: &Skill) -> Result<Skill> {
        sqlx::query(
            r#"
            UPDATE skills
            SET name = ?, category = ?, icon_url = ?, sort_order = ?
            WHERE id = ?
            "#,
        )
        .bind(&skill.name)
        .bind(&skill.category)
        .bind(&skill.icon_url)
        .bind(skill.sort_order)
        .bind(skill.id)
        .execute(&self.pool)
        .await
        .context("Failed to update skill")?;

        Ok(skill.clone())
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM skills WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete skill")?;

        Ok(result.rows_affected() > 0)
    }
}

/// Convert a database row to a Skill
fn row_to_skill(row: &sqlx::sqlite::SqliteRow) -> Result<Skill> {
    Ok(Skill {
        id: row.try_get("id").context("Missing id column")?,
        name: row.try_get("name").context("Missing name column")?,
        category: row.try_get("category").context("Missing category column")?,
        icon_url: row.try_get("icon_url").context("Missing icon_url column")?,
        sort_order: row
            .try_get("sort_order")
            .context("Missing sort_order column")?,
        created_at: row
            .try_get("created_at")
            .context("Missing created_at column")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};

    async fn setup_test_repo() -> SqlxSkillRepository {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        SqlxSkillRepository::new(pool)
    }

    fn test_skill(name: &str, category: &str, sort_order: i64) -> Skill {
        Skill {
            id: 0,
            name: name.to_string(),
            category: category.to_string(),
            icon_url: None,
            sort_order,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let repo = setup_test_repo().await;

        let created = repo
            .create(&test_skill("Rust", "backend", 1))
            .await
            .expect("Failed to create skill");
        assert!(created.id > 0);

        let found = repo
            .get_by_name_and_category("Rust", "backend")
            .await
            .unwrap();
        assert_eq!(found.map(|s| s.id), Some(created.id));
    }

    #[tokio::test]
    async fn test_same_name_different_category_allowed() {
        let repo = setup_test_repo().await;
        repo.create(&test_skill("Testing", "backend", 0)).await.unwrap();

        let result = repo.create(&test_skill("Testing", "frontend", 0)).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_duplicate_name_category_rejected() {
        let repo = setup_test_repo().await;
        repo.create(&test_skill("Rust", "backend", 0)).await.unwrap();

        let result = repo.create(&test_skill("Rust", "backend", 1)).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_list_ordering() {
        let repo = setup_test_repo().await;
        repo.create(&test_skill("Svelte", "frontend", 2)).await.unwrap();
        repo.create(&test_skill("React", "frontend", 1)).await.unwrap();
        repo.create(&test_skill("Rust", "backend", 1)).await.unwrap();

        let skills = repo.list().await.unwrap();
        let names: Vec<&str> = skills.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Rust", "React", "Svelte"]);
    }

    #[tokio::test]
    async fn test_update() {
        let repo = setup_test_repo().await;
        let mut skill = repo.create(&test_skill("Rust", "backend", 0)).await.unwrap();

        skill.sort_order = 5;
        skill.icon_url = Some("https://example.com/rust.svg".to_string());
        repo.update(&skill).await.unwrap();

        let found = repo.get_by_id(skill.id).await.unwrap().unwrap();
        assert_eq!(found.sort_order, 5);
        assert_eq!(found.icon_url.as_deref(), Some("https://example.com/rust.svg"));
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = setup_test_repo().await;
        let skill = repo.create(&test_skill("Old", "tools", 0)).await.unwrap();

        assert!(repo.delete(skill.id).await.unwrap());
        assert!(!repo.delete(skill.id).await.unwrap());
    }
}
