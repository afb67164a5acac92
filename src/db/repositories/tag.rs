//! Tag repository
//!
//! Database operations for tags.
//!
//! This module provides:
//! - `TagRepository` trait defining the interface for tag data access
//! - `SqlxTagRepository` implementing the trait for SQLite

use crate::models::Tag;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

/// Tag repository trait
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// Create a new tag
    async fn create(&self, tag: &Tag) -> Result<Tag>;

    /// Get tag by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Tag>>;

    /// Get tag by slug
    async fn get_by_slug(&self, slug: &str) -> Result<Option<Tag>>;

    /// Get tag by name
    async fn get_by_name(&self, name: &str) -> Result<Option<Tag>>;

    /// List all tags ordered by name
    async fn list(&self) -> Result<Vec<Tag>>;

    /// Delete a tag
    async fn delete(&self, id: i64) -> Result<()>;
}

/// SQLx-based tag repository implementation
pub struct SqlxTagRepository {
    pool: SqlitePool,
}

impl SqlxTagRepository {
    /// Create a new SQLx tag repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn TagRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl TagRepository for SqlxTagRepository {
    async fn create(&self, tag: &Tag) -> Result<Tag> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO tags (name, slug, created_at)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(&tag.name)
        .bind(&tag.slug)
        .bind(now)
        .execute(&self.pool)
        .await
        .context("Failed to create tag")?;

        Ok(Tag {
            id: result.last_insert_rowid(),
            name: tag.name.clone(),
            slug: tag.slug.clone(),
            created_at: now,
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Tag>> {
        let row = sqlx::query("SELECT id, name, slug, created_at FROM tags WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to get tag by ID")?;

        row.map(|row| row_to_tag(&row)).transpose()
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<Tag>> {
        let row = sqlx::query("SELECT id, name, slug, created_at FROM tags WHERE slug = ?")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to get tag by slug")?;

        row.map(|row| row_to_tag(&row)).transpose()
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<Tag>> {
        let row = sqlx::query("SELECT id, name, slug, created_at FROM tags WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to get tag by name")?;

        row.map(|row| row_to_tag(&row)).transpose()
    }

    async fn list(&self) -> Result<Vec<Tag>> {
        let rows = sqlx::query("SELECT id, name, slug, created_at FROM tags ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .context("Failed to list tags")?;

        rows.iter().map(row_to_tag).collect()
    }

    async fn delete(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM tags WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete tag")?;

        Ok(())
    }
}

/// Convert a database row to a Tag
pub(crate) fn row_to_tag(row: &sqlx::sqlite::SqliteRow) -> Result<Tag> {
    Ok(Tag {
        id: row.try_get("id").context("Missing id column")?,
        name: row.try_get("name").context("Missing name column")?,
        slug: row.try_get("slug").context("Missing slug column")?,
        created_at: row
            .try_get("created_at")
            .context("Missing created_at column")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};

    async fn setup_test_repo() -> SqlxTagRepository {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        SqlxTagRepository::new(pool)
    }

    #[tokio::test]
    async fn test_create_tag() {
        let repo = setup_test_repo().await;
        let tag = Tag::new("Rust".to_string(), "rust".to_string());

        let created = repo.create(&tag).await.expect("Failed to create tag");

        assert!(created.id > 0);
        assert_eq!(created.name, "Rust");
        assert_eq!(created.slug, "rust");
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let repo = setup_test_repo().await;
        let created = repo
            .create(&Tag::new("Rust".to_string(), "rust".to_string()))
            .await
            .unwrap();

        let found = repo.get_by_id(created.id).await.unwrap();
        assert_eq!(found.as_ref().map(|t| t.name.as_str()), Some("Rust"));

        let missing = repo.get_by_id(9999).await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_get_by_name_and_slug() {
        let repo = setup_test_repo().await;
        repo.create(&Tag::new("Web Dev".to_string(), "web-dev".to_string()))
            .await
            .unwrap();

        let by_name = repo.get_by_name("Web Dev").await.unwrap();
        assert!(by_name.is_some());

        let by_slug = repo.get_by_slug("web-dev").await.unwrap();
        assert_eq!(by_name.unwrap().id, by_slug.unwrap().id);
    }

    #[tokio::test]
    async fn test_list_ordered_by_name() {
        let repo = setup_test_repo().await;
        repo.create(&Tag::new("Zig".to_string(), "zig".to_string()))
            .await
            .unwrap();
        repo.create(&Tag::new("Axum".to_string(), "axum".to_string()))
            .await
            .unwrap();

        let tags = repo.list().await.unwrap();
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].name, "Axum");
        assert_eq!(tags[1].name, "Zig");
    }

    #[tokio::test]
    async fn test_delete_tag() {
        let repo = setup_test_repo().await;
        let created = repo
            .create(&Tag::new("Temp".to_string(), "temp".to_string()))
            .await
            .unwrap();

        repo.delete(created.id).await.unwrap();

        assert!(repo.get_by_id(created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_slug_rejected() {
        let repo = setup_test_repo().await;
        repo.create(&Tag::new("Rust".to_string(), "rust".to_string()))
            .await
            .unwrap();

        let result = repo
            .create(&Tag::new("Rust 2".to_string(), "rust".to_string()))
            .await;
        assert!(result.is_err());
    }
}
