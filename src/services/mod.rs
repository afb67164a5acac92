//! Business logic services
//!
//! Services sit between the HTTP handlers and the repositories. Each service
//! owns the validation and business rules for one concern.

pub mod auth;
pub mod experience;
pub mod media;
pub mod post;
pub mod project;
pub mod skill;
pub mod tag;
pub mod tech;

pub use auth::AuthService;
pub use experience::ExperienceService;
pub use media::MediaService;
pub use post::PostService;
pub use project::ProjectService;
pub use skill::SkillService;
pub use tag::TagService;
pub use tech::TechService;
