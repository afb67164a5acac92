//! Project repository
//!
//! Database operations for portfolio projects and their tech stack links.
//! Tech entries are created or reused by name when a project's stack is
//! replaced, mirroring how the admin panel submits plain name lists.

use crate::db::repositories::tech::row_to_tech;
use crate::models::{Project, Tech};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

/// Project repository trait
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Create a new project
    async fn create(&self, project: &Project) -> Result<Project>;

    /// Get project by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Project>>;

    /// Get project by slug
    async fn get_by_slug(&self, slug: &str) -> Result<Option<Project>>;

    /// List projects, featured first, then by sort order.
    /// When `published_only` is set, drafts are excluded.
    async fn list(&self, published_only: bool) -> Result<Vec<Project>>;

    /// Update an existing project (full row write)
    async fn update(&self, project: &Project) -> Result<Project>;

    /// Delete a project. Returns true when a row was removed.
    async fn delete(&self, id: i64) -> Result<bool>;

    /// Get the tech stack for a project
    async fn get_techs(&self, project_id: i64) -> Result<Vec<Tech>>;

    /// Replace a project's tech stack with the given names,
    /// creating or reusing tech entries as needed.
    async fn replace_techs(&self, project_id: i64, tech_names: &[String]) -> Result<Vec<Tech>>;
}

/// SQLx-based project repository implementation
pub struct SqlxProjectRepository {
    pool: SqlitePool,
}

impl SqlxProjectRepository {
    /// Create a new SQLx project repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn ProjectRepository> {
        Arc::new(Self::new(pool))
    }
}

const PROJECT_COLUMNS: &str = "id, title, slug, description, thumbnail_url, live_url, \
     github_url, featured, published, sort_order, created_at, updated_at";

#[async_trait]
impl ProjectRepository for SqlxProjectRepository {
    async fn create(&self, project: &Project) -> Result<Project> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO projects
                (title, slug, description, thumbnail_url, live_url, github_url,
                 featured, published, sort_order, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&project.title)
        .bind(&project.slug)
        .bind(&project.description)
        .bind(&project.thumbnail_url)
        .bind(&project.live_url)
        .bind(&project.github_url)
        .bind(project.featured)
        .bind(project.published)
        .bind(project.sort_order)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .context("Failed to create project")?;

        Ok(Project {
            id: result.last_insert_rowid(),
            created_at: now,
            updated_at: now,
            ..project.clone()
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Project>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM projects WHERE id = ?",
            PROJECT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get project by ID")?;

        row.map(|row| row_to_project(&row)).transpose()
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<Project>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM projects WHERE slug = ?",
            PROJECT_COLUMNS
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get project by slug")?;

        row.map(|row| row_to_project(&row)).transpose()
    }

    async fn list(&self, published_only: bool) -> Result<Vec<Project>> {
        let sql = if published_only {
            format!(
                "SELECT {} FROM projects WHERE published = 1 \
                 ORDER BY featured DESC, sort_order ASC",
                PROJECT_COLUMNS
            )
        } else {
            format!(
                "SELECT {} FROM projects ORDER BY featured DESC, sort_order ASC",
                PROJECT_COLUMNS
            )
        };

        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .context("Failed to list projects")?;

        rows.iter().map(row_to_project).collect()
    }

    async fn update(&self, project: &Project) -> Result<Project> {
        let now = Utc::now();

        sqlx::query(
            r#"
            UPDATE projects
            SET title = ?, slug = ?, description = ?, thumbnail_url = ?,
                live_url = ?, github_url = ?, featured = ?, published = ?,
                sort_order = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&project.title)
        .bind(&project.slug)
        .bind(&project.description)
        .bind(&project.thumbnail_url)
        .bind(&project.live_url)
        .bind(&project.github_url)
        .bind(project.featured)
        .bind(project.published)
        .bind(project.sort_order)
        .bind(now)
        .bind(project.id)
        .execute(&self.pool)
        .await
        .context("Failed to update project")?;

        Ok(Project {
            updated_at: now,
            ..project.clone()
        })
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        // Link rows go with the project via ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete project")?;

        Ok(result.rows_affected() > 0)
    }

    async fn get_techs(&self, project_id: i64) -> Result<Vec<Tech>> {
        let rows = sqlx::query(
            r#"
            SELECT t.id, t.name, t.created_at
            FROM techs t
            INNER JOIN project_techs pt ON pt.tech_id = t.id
            WHERE pt.project_id = ?
            ORDER BY t.name
            "#,
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to get project techs")?;

        rows.iter().map(row_to_tech).collect()
    }

    async fn replace_techs(&self, project_id: i64, tech_names: &[String]) -> Result<Vec<Tech>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;

        sqlx::query("DELETE FROM project_techs WHERE project_id = ?")
            .bind(project_id)
            .execute(&mut *tx)
            .await
            .context("Failed to clear project techs")?;

        let mut techs = Vec::with_capacity(tech_names.len());
        for name in tech_names {
            let name = name.trim();
            if name.is_empty() {
                continue;
            }

            // Create or reuse by name
            let existing =
                sqlx::query("SELECT id, name, created_at FROM techs WHERE name = ?")
                    .bind(name)
                    .fetch_optional(&mut *tx)
                    .await
                    .context("Failed to look up tech")?;

            let tech = match existing {
                Some(row) => row_to_tech(&row)?,
                None => {
                    let now = Utc::now();
                    let result =
                        sqlx::query("INSERT INTO techs (name, created_at) VALUES (?, ?)")
                            .bind(name)
                            .bind(now)
                            .execute(&mut *tx)
                            .await
                            .context("Failed to create tech")?;
                    Tech {
                        id: result.last_insert_rowid(),
                        name: name.to_string(),
                        created_at: now,
                    }
                }
            };

            sqlx::query(
                "INSERT OR IGNORE INTO project_techs (project_id, tech_id) VALUES (?, ?)",
            )
            .bind(project_id)
            .bind(tech.id)
            .execute(&mut *tx)
            .await
            .context("Failed to link tech to project")?;

            techs.push(tech);
        }

        tx.commit().await.context("Failed to commit transaction")?;

        Ok(techs)
    }
}

/// Convert a database row to a Project
fn row_to_project(row: &sqlx::sqlite::SqliteRow) -> Result<Project> {
    Ok(Project {
        id: row.try_get("id").context("Missing id column")?,
        title: row.try_get("title").context("Missing title column")?,
        slug: row.try_get("slug").context("Missing slug column")?,
        description: row
            .try_get("description")
            .context("Missing description column")?,
        thumbnail_url: row
            .try_get("thumbnail_url")
            .context("Missing thumbnail_url column")?,
        live_url: row.try_get("live_url").context("Missing live_url column")?,
        github_url: row
            .try_get("github_url")
            .context("Missing github_url column")?,
        featured: row.try_get("featured").context("Missing featured column")?,
        published: row
            .try_get("published")
            .context("Missing published column")?,
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
