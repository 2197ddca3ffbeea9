//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid bind address {0}")]
    InvalidBindAddress(String),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid database URL format")]
    InvalidDatabaseUrl,

    #[error("Pool min_connections exceeds max_connections")]
    InvalidPoolSize,

    #[error("Pool size exceeds maximum allowed (100)")]
    PoolSizeTooLarge,

    #[error("Invalid AI base URL")]
    InvalidAiBaseUrl,

    #[error("Assistant name cannot be empty")]
    EmptyAssistantName,

    #[error("Follow-up delay must be at most 60000ms")]
    FollowUpDelayTooLong,

    #[error("Worker poll interval must be between 1 and 10000ms")]
    InvalidPollInterval,

    #[error("Conversation AI deadline must be greater than zero")]
    InvalidAiDeadline,

    #[error("AI calls could outlast the request timeout ({ai_secs}s >= {request_secs}s)")]
    AiBudgetExceedsRequestTimeout { ai_secs: u64, request_secs: u64 },
}
