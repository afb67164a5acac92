//! Post service
//!
//! Business logic for blog posts: slug uniqueness, reading time estimation,
//! tag replacement and `published_at` stamping on first publish.

use crate::db::repositories::PostRepository;
use crate::models::post::estimate_reading_time;
use crate::models::{CreatePost, Post, PostWithTags, UpdatePost};
use crate::services::tag::generate_slug;
use anyhow::Context;
use chrono::Utc;
use std::sync::Arc;

/// Error types for post service operations
#[derive(Debug, thiserror::Error)]
pub enum PostServiceError {
    /// Post not found
    #[error("Post not found: {0}")]
    NotFound(i64),

    /// Slug already in use by another post
    #[error("Slug already in use: {0}")]
    SlugTaken(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Post service for managing blog posts
pub struct PostService {
    repo: Arc<dyn PostRepository>,
}

impl PostService {
    /// Create a new post service
    pub fn new(repo: Arc<dyn PostRepository>) -> Self {
        Self { repo }
    }

    /// List posts with their tags, newest first.
    /// When `published_only` is set, drafts are excluded.
    pub async fn list(&self, published_only: bool) -> Result<Vec<PostWithTags>, PostServiceError> {
        let posts = self
            .repo
            .list(published_only)
            .await
            .context("Failed to list posts")?;

        let mut result = Vec::with_capacity(posts.len());
        for post in posts {
            let tags = self
                .repo
                .get_tags(post.id)
                .await
                .context("Failed to load post tags")?;
            result.push(PostWithTags { post, tags });
        }

        Ok(result)
    }

    /// Get a post by ID with its tags
    pub async fn get(&self, id: i64) -> Result<PostWithTags, PostServiceError> {
        let post = self
            .repo
            .get_by_id(id)
            .await
            .context("Failed to get post")?
            .ok_or(PostServiceError::NotFound(id))?;

        let tags = self
            .repo
            .get_tags(post.id)
            .await
            .context("Failed to load post tags")?;

        Ok(PostWithTags { post, tags })
    }

    /// Get a post by slug with its tags
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<PostWithTags>, PostServiceError> {
        let post = self
            .repo
            .get_by_slug(slug)
            .await
            .context("Failed to get post by slug")?;

        match post {
            Some(post) => {
                let tags = self
                    .repo
                    .get_tags(post.id)
                    .await
                    .context("Failed to load post tags")?;
                Ok(Some(PostWithTags { post, tags }))
            }
            None => Ok(None),
        }
    }

    /// Create a new post with its tags.
    ///
    /// Reading time is derived from the content; `published_at` is stamped
    /// when the post is created already published.
    pub async fn create(&self, input: CreatePost) -> Result<PostWithTags, PostServiceError> {
        let title = input.title.trim().to_string();
        let slug = input.slug.trim().to_string();
        if title.is_empty() {
            return Err(PostServiceError::ValidationError(
                "Title cannot be empty".to_string(),
            ));
        }
        if slug.is_empty() {
            return Err(PostServiceError::ValidationError(
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
            return Err(PostServiceError::SlugTaken(slug));
        }

        let now = Utc::now();
        let post = Post {
            id: 0,
            title,
            slug,
            excerpt: input.excerpt,
            reading_time: estimate_reading_time(&input.content),
            content: input.content,
            cover_url: input.cover_url,
            published: input.published,
            published_at: if input.published { Some(now) } else { None },
            created_at: now,
            updated_at: now,
        };

        let created = self
            .repo
            .create(&post)
            .await
            .context("Failed to create post")?;
        let tags = self
            .repo
            .replace_tags(created.id, &tag_pairs(&input.tags))
            .await
            .context("Failed to attach tags")?;

        Ok(PostWithTags {
            post: created,
            tags,
        })
    }

    /// Update a post. Absent fields are left unchanged; a present tag list
    /// replaces the full set. `published_at` is stamped the first time
    /// `published` becomes true and preserved afterwards.
    pub async fn update(
        &self,
        id: i64,
        input: UpdatePost,
    ) -> Result<PostWithTags, PostServiceError> {
        let mut post = self
            .repo
            .get_by_id(id)
            .await
            .context("Failed to get post")?
            .ok_or(PostServiceError::NotFound(id))?;

        if let Some(slug) = &input.slug {
            let slug = slug.trim();
            if slug.is_empty() {
                return Err(PostServiceError::ValidationError(
                    "Slug cannot be empty".to_string(),
                ));
            }
            if slug != post.slug {
                if self
                    .repo
                    .get_by_slug(slug)
                    .await
                    .context("Failed to check slug")?
                    .is_some()
                {
                    return Err(PostServiceError::SlugTaken(slug.to_string()));
                }
                post.slug = slug.to_string();
            }
        }

        if let Some(title) = input.title {
            let title = title.trim().to_string();
            if title.is_empty() {
                return Err(PostServiceError::ValidationError(
                    "Title cannot be empty".to_string(),
                ));
            }
            post.title = title;
        }
        if let Some(excerpt) = input.excerpt {
            post.excerpt = excerpt;
        }
        if let Some(content) = input.content {
            post.reading_time = estimate_reading_time(&content);
            post.content = content;
        }
        if let Some(cover_url) = input.cover_url {
            post.cover_url = cover_url;
        }
        if let Some(published) = input.published {
            // First publish stamps the timestamp; later toggles keep it
            if published && post.published_at.is_none() {
                post.published_at = Some(Utc::now());
            }
            post.published = published;
        }

        let updated = self
            .repo
            .update(&post)
            .await
            .context("Failed to update post")?;

        let tags = match input.tags {
            Some(names) => self
                .repo
                .replace_tags(id, &tag_pairs(&names))
                .await
                .context("Failed to replace tags")?,
            None => self
                .repo
                .get_tags(id)
                .await
                .context("Failed to load post tags")?,
        };

        Ok(PostWithTags {
            post: updated,
            tags,
        })
    }

    /// Delete a post by ID
    pub async fn delete(&self, id: i64) -> Result<(), PostServiceError> {
        let removed = self
            .repo
            .delete(id)
            .await
            .context("Failed to delete post")?;
        if !removed {
            return Err(PostServiceError::NotFound(id));
        }
        Ok(())
    }
}

/// Pair tag names with generated slugs for the repository
fn tag_pairs(names: &[String]) -> Vec<(String, String)> {
    names
        .iter()
        .map(|name| {
            let trimmed = name.trim().to_string();
            let slug = generate_slug(&trimmed);
            (trimmed, slug)
        })
        .collect()
}
