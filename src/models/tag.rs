//! Tag model
//!
//! Tags categorize blog posts. They are created on demand and reused by name.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tag entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tag {
    /// Unique identifier
    pub id: i64,
    /// Tag name
    pub name: String,
    /// URL-friendly slug (unique)
    pub slug: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Tag {
    /// Create a new Tag. The ID is assigned by the database.
    pub fn new(name: String, slug: String) -> Self {
        Self {
            id: 0,
            name,
            slug,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_new() {
        let tag = Tag::new("Rust Programming".to_string(), "rust-programming".to_string());

        assert_eq!(tag.id, 0);
        assert_eq!(tag.name, "Rust Programming");
        assert_eq!(tag.slug, "rust-programming");
    }
}
