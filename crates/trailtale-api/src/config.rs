//! Startup configuration from environment variables and the hunt file.

use std::time::Duration;

use trailtale_narrative::client::StorytellerConfig;
use trailtale_session::domain::plan::HuntConfig;

use crate::error::AppError;

/// Fully resolved server configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Participants and checkpoint plan.
    pub hunt: HuntConfig,
    /// External generation service settings.
    pub storyteller: StorytellerConfig,
}

impl AppConfig {
    /// Reads configuration from the environment and the hunt YAML file
    /// (`HUNT_CONFIG`, default `hunt.yaml`).
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` with a descriptive message for any
    /// missing or invalid value. This is the startup fail-fast path; the
    /// strict roster/slot-count check happens inside hunt validation.
    pub fn from_env() -> Result<Self, AppError> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_owned());
        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".to_owned())
            .parse()
            .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?;

        let hunt_path = std::env::var("HUNT_CONFIG").unwrap_or_else(|_| "hunt.yaml".to_owned());
        let hunt_source = std::fs::read_to_string(&hunt_path).map_err(|e| {
            AppError::Config(format!("cannot read hunt config file {hunt_path}: {e}"))
        })?;
        let hunt = HuntConfig::from_yaml(&hunt_source)
            .map_err(|e| AppError::Config(format!("{hunt_path}: {e}")))?;

        let base_url = require_env("STORYTELLER_BASE_URL")?;
        let api_key = require_env("STORYTELLER_API_KEY")?;
        let model = require_env("STORYTELLER_MODEL")?;
        let timeout_secs: u64 = std::env::var("STORYTELLER_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_owned())
            .parse()
            .map_err(|e| {
                AppError::Config(format!("STORYTELLER_TIMEOUT_SECS must be an integer: {e}"))
            })?;

        Ok(Self {
            host,
            port,
            hunt,
            storyteller: StorytellerConfig {
                base_url,
                api_key,
                model,
                timeout: Duration::from_secs(timeout_secs),
            },
        })
    }
}

fn require_env(name: &str) -> Result<String, AppError> {
    std::env::var(name)
        .map_err(|_| AppError::Config(format!("{name} environment variable must be set")))
}
