//! Database repositories
//!
//! Repository pattern implementations for database access.
//! Each repository handles CRUD operations for a specific entity.

pub mod experience;
pub mod post;
pub mod project;
pub mod skill;
pub mod tag;
pub mod tech;

pub use experience::{ExperienceRepository, SqlxExperienceRepository};
pub use post::{PostRepository, SqlxPostRepository};
pub use project::{ProjectRepository, SqlxProjectRepository};
pub use skill::{SkillRepository, SqlxSkillRepository};
pub use tag::{SqlxTagRepository, TagRepository};
pub use tech::{SqlxTechRepository, TechRepository};
