//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `MERGE_RELAY` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use merge_relay::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {:?}", config.server.socket_addr());
//! ```

mod error;
mod gitlab;
mod handlers;
mod server;
mod webhook;
mod youtrack;

pub use error::{ConfigError, ValidationError};
pub use gitlab::GitLabConfig;
pub use handlers::HandlersConfig;
pub use server::ServerConfig;
pub use webhook::WebhookConfig;
pub use youtrack::YouTrackConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (bind address, logging, webhook deadline)
    #[serde(default)]
    pub server: ServerConfig,

    /// GitLab API configuration
    #[serde(default)]
    pub gitlab: GitLabConfig,

    /// Inbound webhook configuration
    #[serde(default)]
    pub webhook: WebhookConfig,

    /// YouTrack configuration, absent when no issue tracker is used
    pub youtrack: Option<YouTrackConfig>,

    /// Handler selection
    #[serde(default)]
    pub handlers: HandlersConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `MERGE_RELAY` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `MERGE_RELAY__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `MERGE_RELAY__GITLAB__PRIVATE_TOKEN=...` -> `gitlab.private_token = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("MERGE_RELAY")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.gitlab.validate()?;
        if let Some(youtrack) = &self.youtrack {
            youtrack.validate()?;
        }
        self.handlers.validate()?;
        Ok(())
    }
}
