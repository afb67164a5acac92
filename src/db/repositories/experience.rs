//! Experience repository
//!
//! Database operations for work experience entries.

use crate::models::Experience;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

/// Experience repository trait
#[async_trait]
pub trait ExperienceRepository: Send + Sync {
    /// Create a new experience entry
    async fn create(&self, experience: &Experience) -> Result<Experience>;

    /// Get experience by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Experience>>;

    /// List all experiences, current positions first, then most recent
    async fn list(&self) -> Result<Vec<Experience>>;

    /// Update an existing experience (full row write)
    async fn update(&self, experience: &Experience) -> Result<Experience>;

    /// Delete an experience. Returns true when a row was removed.
    async fn delete(&self, id: i64) -> Result<bool>;
}

/// SQLx-based experience repository implementation
pub struct SqlxExperienceRepository {
    pool: SqlitePool,
}

impl SqlxExperienceRepository {
    /// Create a new SQLx experience repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn ExperienceRepository> {
        Arc::new(Self::new(pool))
    }
}

const EXPERIENCE_COLUMNS: &str = "id, company, role, description, logo_url, start_date, \
     end_date, current, sort_order, created_at, updated_at";

#[async_trait]
impl ExperienceRepository for SqlxExperienceRepository {
    async fn create(&self, experience: &Experience) -> Result<Experience> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO experiences
                (company, role, description, logo_url, start_date, end_date,
                 current, sort_order, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&experience.company)
        .bind(&experience.role)
        .bind(&experience.description)
        .bind(&experience.logo_url)
        .bind(experience.start_date)
        .bind(experience.end_date)
        .bind(experience.current)
        .bind(experience.sort_order)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .context("Failed to create experience")?;

        Ok(Experience {
            id: result.last_insert_rowid(),
            created_at: now,
            updated_at: now,
            ..experience.clone()
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Experience>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM experiences WHERE id = ?",
            EXPERIENCE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get experience by ID")?;

        row.map(|row| row_to_experience(&row)).transpose()
    }

    async fn list(&self) -> Result<Vec<Experience>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM experiences ORDER BY current DESC, start_date DESC",
            EXPERIENCE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .context("Failed to list experiences")?;

        rows.iter().map(row_to_experience).collect()
    }

    async fn update(&self, experience: &Experience) -> Result<Experience> {
        let now = Utc::now();

        sqlx::query(
            r#"
            UPDATE experiences
            SET company = ?, role = ?, description = ?, logo_url = ?,
                start_date = ?, end_date = ?, current = ?, sort_order = ?,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&experience.company)
        .bind(&experience.role)
        .bind(&experience.description)
        .bind(&experience.logo_url)
        .bind(experience.start_date)
        .bind(experience.end_date)
        .bind(experience.current)
        .bind(experience.sort_order)
        .bind(now)
        .bind(experience.id)
        .execute(&self.pool)
        .await
        .context("Failed to update experience")?;

        Ok(Experience {
            updated_at: now,
            ..experience.clone()
        })
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM experiences WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete experience")?;

        Ok(result.rows_affected() > 0)
    }
}

/// Convert a database row to an Experience
fn row_to_experience(row: &sqlx::sqlite::SqliteRow) -> Result<Experience> {
    Ok(Experience {
        id: row.try_get("id").context("Missing id column")?,
        company: row.try_get("company").context("Missing company column")?,
        role: row.try_get("role").context("Missing role column")?,
        description: row
            .try_get("description")
            .context("Missing description column")?,
        logo_url: row.try_get("logo_url").context("Missing logo_url column")?,
        start_date: row
            .try_get("start_date")
            .context("Missing start_date column")?,
        end_date: row.try_get("end_date").context("Missing end_date column")?,
        current: row.try_get("current").context("Missing current column")?,
        sort_order: row
            .try_get("sort_order")
            .context("Missing sort_order column")?,
        created_at: row
            .try_get("created_at")
            .context("Missing created_at column")?,
        updated_at: row
            .try_get("updated_at")
            .context("Missing updated_at column")?,
    })
}
