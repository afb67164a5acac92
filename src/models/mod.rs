//! Data models for the Vitrine portfolio system

use serde::{Deserialize, Deserializer};

pub mod experience;
pub mod post;
pub mod project;
pub mod session;
pub mod skill;
pub mod tag;
pub mod tech;

pub use experience::{CreateExperience, Experience, UpdateExperience};
pub use post::{CreatePost, Post, PostWithTags, UpdatePost};
pub use project::{CreateProject, Project, ProjectWithTechs, UpdateProject};
pub use session::Session;
pub use skill::{CreateSkill, Skill, UpdateSkill};
pub use tag::Tag;
pub use tech::Tech;

/// Deserialize a nullable update field so an explicit `null` arrives as
/// `Some(None)` (clear the column) while an absent field stays `None`
/// (leave it unchanged). Used with `#[serde(default, deserialize_with)]`
/// on `Option<Option<T>>` fields in the Update input types.
pub(crate) fn nullable_update<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "super::nullable_update")]
        url: Option<Option<String>>,
    }

    #[test]
    fn test_nullable_update_distinguishes_null_from_absent() {
        let absent: Patch = serde_json::from_str("{}").unwrap();
        assert!(absent.url.is_none());

        let cleared: Patch = serde_json::from_str(r#"{"url":null}"#).unwrap();
        assert_eq!(cleared.url, Some(None));

        let set: Patch = serde_json::from_str(r#"{"url":"x"}"#).unwrap();
        assert_eq!(set.url, Some(Some("x".to_string())));
    }
}
