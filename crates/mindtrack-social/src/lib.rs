use apis::setup_routes;
use axum::Router;
use repositories::{
    memory_repository::InMemoryUserRepository,
    user_repository::{PgUserRepository, UserRepository},
};
use services::{auth_service::AuthService, follow_service::FollowService};
use sqlx::postgres::PgPool;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

pub mod apis;
pub mod models;
pub mod repositories;
pub mod services;
pub mod settings;
pub mod utils;

pub struct AppState {
    pub follow_service: FollowService,
    pub auth_service: AuthService,
}

pub async fn setup_database(database_url: &str) -> Result<Arc<PgPool>, sqlx::Error> {
    let pool = PgPool::connect(database_url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    Ok(Arc::new(pool))
}

pub async fn setup_router(settings: &settings::Settings) -> anyhow::Result<Router> {
    let user_repository = setup_repository(settings).await?;
    let app_state = setup_services(user_repository, settings);

    Ok(setup_routes(Arc::new(app_state)))
}

/// Postgres when `DATABASE_URL` is set, otherwise a process-local directory.
pub async fn setup_repository(
    settings: &settings::Settings,
) -> anyhow::Result<Arc<dyn UserRepository>> {
    match settings.database_url.as_deref() {
        Some(database_url) => {
            let db = setup_database(database_url).await?;
            info!("Connected to the database");
            Ok(Arc::new(PgUserRepository::new(db)))
        }
        None => {
            warn!("DATABASE_URL not set, relationships are kept in memory only");
            Ok(Arc::new(InMemoryUserRepository::new()))
        }
    }
}

pub fn setup_services(
    user_repository: Arc<dyn UserRepository>,
    settings: &settings::Settings,
) -> AppState {
    AppState {
        follow_service: FollowService::new(user_repository),
        auth_service: AuthService::new(&settings.jwt_secret, settings.token_ttl_secs()),
    }
}

pub fn init_tracing(settings: &settings::Settings) {
    let is_prod = settings.is_production();
    let level = if is_prod { "info" } else { "debug" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_thread_names(true)
        .with_ansi(!is_prod)
        .init();
}
