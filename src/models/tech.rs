//! Tech model
//!
//! Technologies attached to projects. Names are unique; entries are created
//! on demand and reused.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Technology entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tech {
    /// Unique identifier
    pub id: i64,
    /// Technology name (unique)
    pub name: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Tech {
    /// Create a new Tech. The ID is assigned by the database.
    pub fn new(name: String) -> Self {
        Self {
            id: 0,
            name,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tech_new() {
        let tech = Tech::new("PostgreSQL".to_string());

        assert_eq!(tech.id, 0);
        assert_eq!(tech.name, "PostgreSQL");
    }
}
