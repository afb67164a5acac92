//! Post repository
//!
//! Database operations for blog posts and their tag links. Tags are created
//! or reused by name when a post's tag set is replaced; the caller supplies
//! the slug to use for newly created tags.

use crate::db::repositories::tag::row_to_tag;
use crate::models::{Post, Tag};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

/// Post repository trait
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Create a new post
    async fn create(&self, post: &Post) -> Result<Post>;

    /// Get post by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Post>>;

    /// Get post by slug
    async fn get_by_slug(&self, slug: &str) -> Result<Option<Post>>;

    /// List posts, newest first.
    /// When `published_only` is set, drafts are excluded.
    async fn list(&self, published_only: bool) -> Result<Vec<Post>>;

    /// Update an existing post (full row write)
    async fn update(&self, post: &Post) -> Result<Post>;

    /// Delete a post. Returns true when a row was removed.
    async fn delete(&self, id: i64) -> Result<bool>;

    /// Get the tags attached to a post
    async fn get_tags(&self, post_id: i64) -> Result<Vec<Tag>>;

    /// Replace a post's tag set with the given (name, slug) pairs,
    /// creating or reusing tag entries as needed.
    async fn replace_tags(&self, post_id: i64, tags: &[(String, String)]) -> Result<Vec<Tag>>;
}

/// SQLx-based post repository implementation
pub struct SqlxPostRepository {
    pool: SqlitePool,
}

impl SqlxPostRepository {
    /// Create a new SQLx post repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn PostRepository> {
        Arc::new(Self::new(pool))
    }
}

const POST_COLUMNS: &str = "id, title, slug, excerpt, content, cover_url, reading_time, \
     published, published_at, created_at, updated_at";

#[async_trait]
impl PostRepository for SqlxPostRepository {
    async fn create(&self, post: &Post) -> Result<Post> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO posts
                (title, slug, excerpt, content, cover_url, reading_time,
                 published, published_at, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&post.title)
        .bind(&post.slug)
        .bind(&post.excerpt)
        .bind(&post.content)
        .bind(&post.cover_url)
        .bind(post.reading_time)
        .bind(post.published)
        .bind(post.published_at)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .context("Failed to create post")?;

        Ok(Post {
            id: result.last_insert_rowid(),
            created_at: now,
            updated_at: now,
            ..post.clone()
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Post>> {
        let row = sqlx::query(&format!("SELECT {} FROM posts WHERE id = ?", POST_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to get post by ID")?;

        row.map(|row| row_to_post(&row)).transpose()
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<Post>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM posts WHERE slug = ?",
            POST_COLUMNS
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get post by slug")?;

        row.map(|row| row_to_post(&row)).transpose()
    }

    async fn list(&self, published_only: bool) -> Result<Vec<Post>> {
        let sql = if published_only {
            format!(
                "SELECT {} FROM posts WHERE published = 1 ORDER BY created_at DESC",
                POST_COLUMNS
            )
        } else {
            format!("SELECT {} FROM posts ORDER BY created_at DESC", POST_COLUMNS)
        };

        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .context("Failed to list posts")?;

        rows.iter().map(row_to_post).collect()
    }

    async fn update(&self, post: &Post) -> Result<Post> {
        let now = Utc::now();

        sqlx::query(
            r#"
            UPDATE posts
            SET title = ?, slug = ?, excerpt = ?, content = ?, cover_url = ?,
                reading_time = ?, published = ?, published_at = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&post.title)
        .bind(&post.slug)
        .bind(&post.excerpt)
        .bind(&post.content)
        .bind(&post.cover_url)
        .bind(post.reading_time)
        .bind(post.published)
        .bind(post.published_at)
        .bind(now)
        .bind(post.id)
        .execute(&self.pool)
        .await
        .context("Failed to update post")?;

        Ok(Post {
            updated_at: now,
            ..post.clone()
        })
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        // Link rows go with the post via ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete post")?;

        Ok(result.rows_affected() > 0)
    }

    async fn get_tags(&self, post_id: i64) -> Result<Vec<Tag>> {
        let rows = sqlx::query(
            r#"
            SELECT t.id, t.name, t.slug, t.created_at
            FROM tags t
            INNER JOIN post_tags pt ON pt.tag_id = t.id
            WHERE pt.post_id = ?
            ORDER BY t.name
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to get post tags")?;

        rows.iter().map(row_to_tag).collect()
    }

    async fn replace_tags(&self, post_id: i64, tags: &[(String, String)]) -> Result<Vec<Tag>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;

        sqlx::query("DELETE FROM post_tags WHERE post_id = ?")
            .bind(post_id)
            .execute(&mut *tx)
            .await
            .context("Failed to clear post tags")?;

        let mut attached = Vec::with_capacity(tags.len());
        for (name, slug) in tags {
            let name = name.trim();
            if name.is_empty() {
                continue;
            }

            // Create or reuse by name
            let existing = sqlx::query("SELECT id, name, slug, created_at FROM tags WHERE name = ?")
                .bind(name)
                .fetch_optional(&mut *tx)
                .await
                .context("Failed to look up tag")?;

            let tag = match existing {
                Some(row) => row_to_tag(&row)?,
                None => {
                    let now = Utc::now();
                    let result =
                        sqlx::query("INSERT INTO tags (name, slug, created_at) VALUES (?, ?, ?)")
                            .bind(name)
                            .bind(slug)
                            .bind(now)
                            .execute(&mut *tx)
                            .await
                            .context("Failed to create tag")?;
                    Tag {
                        id: result.last_insert_rowid(),
                        name: name.to_string(),
                        slug: slug.clone(),
                        created_at: now,
                    }
                }
            };

            sqlx::query("INSERT OR IGNORE INTO post_tags (post_id, tag_id) VALUES (?, ?)")
                .bind(post_id)
                .bind(tag.id)
                .execute(&mut *tx)
                .await
                .context("Failed to link tag to post")?;

            attached.push(tag);
        }

        tx.commit().await.context("Failed to commit transaction")?;

        Ok(attached)
    }
}

/// Convert a database row to a Post
fn row_to_post(row: &sqlx::sqlite::SqliteRow) -> Result<Post> {
    Ok(Post {
        id: row.try_get("id").context("Missing id column")?,
        title: row.try_get("title").context("Missing title column")?,
        slug: row.try_get("slug").context("Missing slug column")?,
        excerpt: row.try_get("excerpt").context("Missing excerpt column")?,
        content: row.try_get("content").context("Missing content column")?,
        cover_url: row
            .try_get("cover_url")
            .context("Missing cover_url column")?,
        reading_time: row
            .try_get("reading_time")
            .context("Missing reading_time column")?,
        published: row
            .try_get("published")
            .context("Missing published column")?,
        published_at: row
            .try_get("published_at")
            .context("Missing published_at column")?,
        created_at: row
            .try_get("created_at")
            .context("Missing created_at column")?,
        updated_at: row
            .try_get("updated_at")
            .context("Missing updated_at column")?,
    })
}
