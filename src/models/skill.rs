//! Skill model
//!
//! Skills are grouped by category; the (name, category) pair is unique.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Skill entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Skill {
    /// Unique identifier
    pub id: i64,
    /// Skill name
    pub name: String,
    /// Grouping category (e.g. "frontend", "backend", "tools")
    pub category: String,
    /// Icon image URL
    pub icon_url: Option<String>,
    /// Manual ordering key within the category
    pub sort_order: i64,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Input for creating a skill
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSkill {
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub icon_url: Option<String>,
    #[serde(default)]
    pub sort_order: i64,
}

/// Input for updating a skill. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSkill {
    pub name: Option<String>,
    pub category: Option<String>,
    #[serde(default, deserialize_with = "crate::models::nullable_update")]
    pub icon_url: Option<Option<String>>,
    pub sort_order: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_skill_defaults() {
        let input: CreateSkill =
            serde_json::from_str(r#"{"name":"Rust","category":"backend"}"#).unwrap();

        assert_eq!(input.name, "Rust");
        assert_eq!(input.category, "backend");
        assert!(input.icon_url.is_none());
        assert_eq!(input.sort_order, 0);
    }
}
