//! Tech repository
//!
//! Database operations for project technologies. Entries are unique by name
//! and created on demand.

use crate::models::Tech;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

/// Tech repository trait
#[async_trait]
pub trait TechRepository: Send + Sync {
    /// Create a new tech entry
    async fn create(&self, tech: &Tech) -> Result<Tech>;

    /// Get tech by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Tech>>;

    /// Get tech by name
    async fn get_by_name(&self, name: &str) -> Result<Option<Tech>>;

    /// List all techs ordered by name
    async fn list(&self) -> Result<Vec<Tech>>;

    /// Delete a tech entry
    async fn delete(&self, id: i64) -> Result<()>;
}

/// SQLx-based tech repository implementation
pub struct SqlxTechRepository {
    pool: SqlitePool,
}

impl SqlxTechRepository {
    /// Create a new SQLx tech repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn TechRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl TechRepository for SqlxTechRepository {
    async fn create(&self, tech: &Tech) -> Result<Tech> {
        let now = Utc::now();

        let result = sqlx::query("INSERT INTO techs (name, created_at) VALUES (?, ?)")
            .bind(&tech.name)
            .bind(now)
            .execute(&self.pool)
            .await
            .context("Failed to create tech")?;

        Ok(Tech {
            id: result.last_insert_rowid(),
            name: tech.name.clone(),
            created_at: now,
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Tech>> {
        let row = sqlx::query("SELECT id, name, created_at FROM techs WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to get tech by ID")?;

        row.map(|row| row_to_tech(&row)).transpose()
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<Tech>> {
        let row = sqlx::query("SELECT id, name, created_at FROM techs WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to get tech by name")?;

        row.map(|row| row_to_tech(&row)).transpose()
    }

    async fn list(&self) -> Result<Vec<Tech>> {
        let rows = sqlx::query("SELECT id, name, created_at FROM techs ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .context("Failed to list techs")?;

        rows.iter().map(row_to_tech).collect()
    }

    async fn delete(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM techs WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete tech")?;

        Ok(())
    }
}

/// Convert a database row to a Tech
pub(crate) fn row_to_tech(row: &sqlx::sqlite::SqliteRow) -> Result<Tech> {
    Ok(Tech {
        id: row.try_get("id").context("Missing id column")?,
        name: row.try_get("name").context("Missing name column")?,
        created_at: row
            .try_get("created_at")
            .context("Missing created_at column")?,
    })
}
