//! Application configuration

use serde::Deserialize;

use crate::error::ServiceError;

/// Settings read from `SOCIAL_`-prefixed environment variables
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Default log filter when `RUST_LOG` is unset
    pub log_level: String,
    /// Emit logs as JSON lines
    pub log_json: bool,
    /// How many times a write reloads and retries after a stale stamp
    pub conflict_retries: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_json: false,
            conflict_retries: 2,
        }
    }
}

impl AppConfig {
    /// Loads `.env` if present, then reads the environment
    pub fn load() -> Result<Self, ServiceError> {
        dotenvy::dotenv().ok();
        Self::from_env().map_err(|e| ServiceError::Configuration(e.to_string()))
    }

    /// Loads configuration from environment, falling back to defaults
    pub fn from_env() -> Result<Self, config::ConfigError> {
        let defaults = Self::default();
        config::Config::builder()
            .set_default("log_level", defaults.log_level)?
            .set_default("log_json", defaults.log_json)?
            .set_default("conflict_retries", i64::from(defaults.conflict_retries))?
            .add_source(config::Environment::with_prefix("SOCIAL").try_parsing(true))
            .build()?
            .try_deserialize()
    }
}
