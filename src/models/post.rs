//! Blog post model
//!
//! Posts carry rendered-elsewhere markdown content, an excerpt and an
//! estimated reading time. `published_at` is stamped the first time a post
//! is published and preserved afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::tag::Tag;

/// Blog post entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Post {
    /// Unique identifier
    pub id: i64,
    /// Display title
    pub title: String,
    /// URL-friendly slug (unique)
    pub slug: String,
    /// Short summary shown in listings
    pub excerpt: String,
    /// Full post body (markdown)
    pub content: String,
    /// Cover image URL
    pub cover_url: Option<String>,
    /// Estimated reading time in minutes
    pub reading_time: i64,
    /// Whether the post is publicly visible
    pub published: bool,
    /// First publication timestamp
    pub published_at: Option<DateTime<Utc>>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Post together with its tags
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostWithTags {
    #[serde(flatten)]
    pub post: Post,
    /// Associated tags
    pub tags: Vec<Tag>,
}

/// Input for creating a post
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePost {
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub excerpt: String,
    pub content: String,
    #[serde(default)]
    pub cover_url: Option<String>,
    #[serde(default)]
    pub published: bool,
    /// Tag names to attach (created or reused by name)
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Input for updating a post. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePost {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    #[serde(default, deserialize_with = "crate::models::nullable_update")]
    pub cover_url: Option<Option<String>>,
    pub published: Option<bool>,
    /// When present, replaces the full tag set
    pub tags: Option<Vec<String>>,
}

/// Estimate reading time from word count, 200 words per minute, rounded up,
/// minimum 1.
pub fn estimate_reading_time(content: &str) -> i64 {
    let words = content.split_whitespace().count() as i64;
    ((words + 199) / 200).max(1)
}
