//! Tag service
//!
//! Business logic for blog tags: create-or-reuse by name with a generated
//! slug, listing and deletion.

use crate::db::repositories::TagRepository;
use crate::models::Tag;
use anyhow::Context;
use std::sync::Arc;

/// Error types for tag service operations
#[derive(Debug, thiserror::Error)]
pub enum TagServiceError {
    /// Tag not found
    #[error("Tag not found: {0}")]
    NotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Tag service for managing blog tags
pub struct TagService {
    repo: Arc<dyn TagRepository>,
}

impl TagService {
    /// Create a new tag service
    pub fn new(repo: Arc<dyn TagRepository>) -> Self {
        Self { repo }
    }

    /// Create a new tag or reuse an existing one by name.
    ///
    /// Returns the tag and whether it was newly created.
    ///
    /// # Errors
    /// - `ValidationError` if the name is empty
    pub async fn create_or_get(&self, name: &str) -> Result<(Tag, bool), TagServiceError> {
        let trimmed_name = name.trim();
        if trimmed_name.is_empty() {
            return Err(TagServiceError::ValidationError(
                "Tag name cannot be empty".to_string(),
            ));
        }

        if let Some(existing) = self
            .repo
            .get_by_name(trimmed_name)
            .await
            .context("Failed to check existing tag")?
        {
            return Ok((existing, false));
        }

        let slug = generate_slug(trimmed_name);
        let tag = Tag::new(trimmed_name.to_string(), slug);
        let created = self
            .repo
            .create(&tag)
            .await
            .context("Failed to create tag")?;

        Ok((created, true))
    }

    /// Get tag by slug
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Tag>, TagServiceError> {
        self.repo
            .get_by_slug(slug)
            .await
            .context("Failed to get tag by slug")
            .map_err(Into::into)
    }

    /// List all tags ordered by name
    pub async fn list(&self) -> Result<Vec<Tag>, TagServiceError> {
        self.repo
            .list()
            .await
            .context("Failed to list tags")
            .map_err(Into::into)
    }

    /// Delete a tag by ID
    pub async fn delete(&self, id: i64) -> Result<(), TagServiceError> {
        let existing = self
            .repo
            .get_by_id(id)
            .await
            .context("Failed to look up tag")?;
        if existing.is_none() {
            return Err(TagServiceError::NotFound(id.to_string()));
        }

        self.repo
            .delete(id)
            .await
            .context("Failed to delete tag")
            .map_err(Into::into)
    }
}

/// Generate a URL-friendly slug from a name.
///
/// Lowercases, maps runs of non-alphanumeric characters to single hyphens
/// and trims leading/trailing hyphens.
pub fn generate_slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_was_hyphen = true;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::SqlxTagRepository;
    use crate::db::{create_test_pool, migrations};

    async fn setup_service() -> TagService {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        TagService::new(SqlxTagRepository::boxed(pool))
    }

    #[tokio::test]
    async fn test_create_or_get_creates_with_slug() {
        let service = setup_service().await;

        let (tag, created) = service.create_or_get("Web Development").await.unwrap();

        assert!(created);
        assert_eq!(tag.name, "Web Development");
        assert_eq!(tag.slug, "web-development");
    }

    #[tokio::test]
    async fn test_create_or_get_reuses_existing() {
        let service = setup_service().await;

        let (first, created_first) = service.create_or_get("Rust").await.unwrap();
        let (second, created_second) = service.create_or_get("Rust").await.unwrap();

        assert!(created_first);
        assert!(!created_second);
        assert_eq!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_create_or_get_trims_name() {
        let service = setup_service().await;

        let (tag, _) = service.create_or_get("  Rust  ").await.unwrap();
        assert_eq!(tag.name, "Rust");
    }

    #[tokio::test]
    async fn test_empty_name_rejected() {
        let service = setup_service().await;

        let result = service.create_or_get("   ").await;
        assert!(matches!(result, Err(TagServiceError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_delete_missing_tag_not_found() {
        let service = setup_service().await;

        let result = service.delete(404).await;
        assert!(matches!(result, Err(TagServiceError::NotFound(_))));
    }

    #[test]
    fn test_generate_slug() {
        assert_eq!(generate_slug("Hello World"), "hello-world");
        assert_eq!(generate_slug("Rust & WebAssembly!"), "rust-webassembly");
        assert_eq!(generate_slug("  spaced  out  "), "spaced-out");
        assert_eq!(generate_slug("already-slugged"), "already-slugged");
        assert_eq!(generate_slug("C++"), "c");
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(20))]

        /// Generated slugs only contain lowercase alphanumerics and single
        /// hyphens, and never start or end with a hyphen.
        #[test]
        fn slug_shape(name in ".{0,60}") {
            let slug = generate_slug(&name);

            prop_assert!(slug
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
            prop_assert!(!slug.starts_with('-'));
            prop_assert!(!slug.ends_with('-'));
            prop_assert!(!slug.contains("--"));
        }

        /// Slug generation is idempotent.
        #[test]
        fn slug_idempotent(name in "[a-zA-Z0-9 ]{0,40}") {
            let once = generate_slug(&name);
            prop_assert_eq!(generate_slug(&once), once.clone());
        }
    }
}
