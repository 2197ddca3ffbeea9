//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `DOT_FEEDBACK` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use dot_feedback::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}", config.server.socket_addr().unwrap());
//! ```

mod ai;
mod conversation;
mod error;
mod server;
mod storage;

pub use ai::AiConfig;
pub use conversation::ConversationConfig;
pub use error::{ConfigError, ValidationError};
pub use server::{Environment, ServerConfig};
pub use storage::{StorageBackend, StorageConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment, logging)
    #[serde(default)]
    pub server: ServerConfig,

    /// Storage backend selection and PostgreSQL pool
    #[serde(default)]
    pub storage: StorageConfig,

    /// OpenAI configuration
    #[serde(default)]
    pub ai: AiConfig,

    /// Follow-up pacing and assistant persona
    #[serde(default)]
    pub conversation: ConversationConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `DOT_FEEDBACK` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `DOT_FEEDBACK__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `DOT_FEEDBACK__STORAGE__DATABASE_URL=...` -> `storage.database_url = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("DOT_FEEDBACK")
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
        self.storage.validate()?;
        self.ai.validate()?;
        self.conversation.validate()?;

        // A request cut off by the timeout layer never posts its fallback reply.
        let request = self.server.request_timeout();
        let ai = self
            .ai
            .worst_case_call()
            .max(self.conversation.ai_budget_per_request());
        if ai >= request {
            return Err(ValidationError::AiBudgetExceedsRequestTimeout {
                ai_secs: ai.as_secs(),
                request_secs: request.as_secs(),
            });
        }
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
