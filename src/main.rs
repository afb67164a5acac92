//! Vitrine - A personal portfolio and blog content server

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vitrine::{
    api::{self, AppState},
    config::Config,
    db::{
        self,
        repositories::{
            SqlxExperienceRepository, SqlxPostRepository, SqlxProjectRepository,
            SqlxSkillRepository, SqlxTagRepository, SqlxTechRepository,
        },
    },
    services::{
        auth::AuthService,
        experience::ExperienceService,
        media::MediaService,
        post::PostService,
        project::ProjectService,
        skill::SkillService,
        tag::TagService,
        tech::TechService,
    },
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vitrine=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Vitrine portfolio server...");

    // Load configuration
    let config = Config::load_with_env(Path::new("config.yml"))?;
    tracing::info!("Configuration loaded");

    if !config.auth.is_complete() {
        tracing::warn!(
            "Admin credentials or signing secret not configured; \
             login is disabled until VITRINE_AUTH_SECRET, VITRINE_ADMIN_EMAIL \
             and VITRINE_ADMIN_PASSWORD are set"
        );
    }

    // Initialize database
    let pool = db::create_pool(&config.database).await?;
    tracing::info!("Database connected: {}", config.database.url);

    // Run migrations
    db::migrations::run_migrations(&pool).await?;
    tracing::info!("Database migrations completed");

    // Create repositories
    let project_repo = SqlxProjectRepository::boxed(pool.clone());
    let post_repo = SqlxPostRepository::boxed(pool.clone());
    let experience_repo = SqlxExperienceRepository::boxed(pool.clone());
    let skill_repo = SqlxSkillRepository::boxed(pool.clone());
    let tag_repo = SqlxTagRepository::boxed(pool.clone());
    let tech_repo = SqlxTechRepository::boxed(pool.clone());

    // Initialize services
    let auth_service = Arc::new(AuthService::new(config.auth.clone()));
    let project_service = Arc::new(ProjectService::new(project_repo));
    let post_service = Arc::new(PostService::new(post_repo));
    let experience_service = Arc::new(ExperienceService::new(experience_repo));
    let skill_service = Arc::new(SkillService::new(skill_repo));
    let tag_service = Arc::new(TagService::new(tag_repo));
    let tech_service = Arc::new(TechService::new(tech_repo));
    let media_service = Arc::new(MediaService::new(
        config.media.clone(),
        config.upload.clone(),
    ));

    // Build application state
    let state = AppState {
        auth_service,
        project_service,
        post_service,
        experience_service,
        skill_service,
        tag_service,
        tech_service,
        media_service,
        upload_config: Arc::new(config.upload.clone()),
    };

    // Build router
    let app = api::build_router(state, &config.server.cors_origin);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
