//! Conversation-specific error types.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, SessionCode, ValidationError};
use crate::domain::session::SessionError;

/// Errors from participant-facing conversation operations.
///
/// Provider failures never appear here; every conversational call site
/// falls back to fixed text instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversationError {
    #[error("Session not found: {0}")]
    SessionNotFound(SessionCode),

    #[error("Validation failed for '{field}': {message}")]
    Validation { field: String, message: String },

    #[error("Storage error: {0}")]
    Storage(String),
}

impl ConversationError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ConversationError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            ConversationError::SessionNotFound(_) => ErrorCode::SessionNotFound,
            ConversationError::Validation { .. } => ErrorCode::ValidationFailed,
            ConversationError::Storage(_) => ErrorCode::DatabaseError,
        }
    }
}

impl From<DomainError> for ConversationError {
    fn from(err: DomainError) -> Self {
        ConversationError::Storage(err.to_string())
    }
}

impl From<ValidationError> for ConversationError {
    fn from(err: ValidationError) -> Self {
        ConversationError::Validation {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<SessionError> for ConversationError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NotFound(code) => ConversationError::SessionNotFound(code),
            SessionError::ValidationFailed { field, message } => {
                ConversationError::Validation { field, message }
            }
            SessionError::Infrastructure(msg) => ConversationError::Storage(msg),
        }
    }
}
