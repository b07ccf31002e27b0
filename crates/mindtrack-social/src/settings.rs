use config::{Config, Environment};
use serde::Deserialize;

use crate::services::auth_service::DEFAULT_TOKEN_TTL_SECS;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub environment: Option<String>,
    pub database_url: Option<String>,
    pub port: Option<u16>,
    pub jwt_secret: String,
    /// Session token lifetime in seconds
    pub jwt_expires_in: Option<i64>,
}

impl Settings {
    pub fn is_production(&self) -> bool {
        self.environment.as_deref() == Some("PROD")
    }

    pub fn token_ttl_secs(&self) -> i64 {
        self.jwt_expires_in.unwrap_or(DEFAULT_TOKEN_TTL_SECS)
    }
}

pub fn load_settings() -> Result<Settings, config::ConfigError> {
    let settings = Config::builder();
    let settings = settings.add_source(Environment::default());
    settings.build()?.try_deserialize()
}
