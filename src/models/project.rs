//! Project model
//!
//! A portfolio project with an attached tech stack. Projects are ordered by
//! featured flag first, then by manual sort order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::tech::Tech;

/// Project entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    /// Unique identifier
    pub id: i64,
    /// Display title
    pub title: String,
    /// URL-friendly slug (unique)
    pub slug: String,
    /// Project description
    pub description: String,
    /// Thumbnail image URL
    pub thumbnail_url: Option<String>,
    /// Live deployment URL
    pub live_url: Option<String>,
    /// Source repository URL
    pub github_url: Option<String>,
    /// Whether the project is pinned to the top of the list
    pub featured: bool,
    /// Whether the project is publicly visible
    pub published: bool,
    /// Manual ordering key
    pub sort_order: i64,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Project together with its tech stack
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectWithTechs {
    #[serde(flatten)]
    pub project: Project,
    /// Associated technologies
    pub techs: Vec<Tech>,
}

/// Input for creating a project
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProject {
    pub title: String,
    pub slug: String,
    pub description: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub live_url: Option<String>,
    #[serde(default)]
    pub github_url: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub sort_order: i64,
    /// Tech names to attach (created or reused by name)
    #[serde(default)]
    pub techs: Vec<String>,
}

/// Input for updating a project. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProject {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "crate::models::nullable_update")]
    pub thumbnail_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::models::nullable_update")]
    pub live_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::models::nullable_update")]
    pub github_url: Option<Option<String>>,
    pub featured: Option<bool>,
    pub published: Option<bool>,
    pub sort_order: Option<i64>,
    /// When present, replaces the full tech stack
    pub techs: Option<Vec<String>>,
}
