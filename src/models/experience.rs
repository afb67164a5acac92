//! Work experience model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Work experience entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Experience {
    /// Unique identifier
    pub id: i64,
    /// Company name
    pub company: String,
    /// Role or job title
    pub role: String,
    /// Free-form description
    pub description: Option<String>,
    /// Company logo URL
    pub logo_url: Option<String>,
    /// Start date
    pub start_date: NaiveDate,
    /// End date, absent for a current position
    pub end_date: Option<NaiveDate>,
    /// Whether this is the current position
    pub current: bool,
    /// Manual ordering key
    pub sort_order: i64,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Input for creating an experience entry
#[derive(Debug, Clone, Deserialize)]
pub struct CreateExperience {
    pub company: String,
    pub role: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub current: bool,
    #[serde(default)]
    pub sort_order: i64,
}

/// Input for updating an experience entry. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateExperience {
    pub company: Option<String>,
    pub role: Option<String>,
    #[serde(default, deserialize_with = "crate::models::nullable_update")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::models::nullable_update")]
    pub logo_url: Option<Option<String>>,
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "crate::models::nullable_update")]
    pub end_date: Option<Option<NaiveDate>>,
    pub current: Option<bool>,
    pub sort_order: Option<i64>,
}
