//! Graph generation error types.

use thiserror::Error;

use super::GraphValidationError;
use crate::domain::foundation::{DomainError, ErrorCode, SessionCode};
use crate::domain::session::SessionError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    #[error("Session not found: {0}")]
    SessionNotFound(SessionCode),

    #[error("No responses found for session {0}")]
    NoResponses(SessionCode),

    #[error("AI provider failed: {0}")]
    AIProvider(String),

    #[error("Generated graph is invalid: {0}")]
    InvalidGraph(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl GraphError {
    pub fn code(&self) -> ErrorCode {
        match self {
            GraphError::SessionNotFound(_) => ErrorCode::SessionNotFound,
            GraphError::NoResponses(_) => ErrorCode::ResponsesNotFound,
            GraphError::AIProvider(_) | GraphError::InvalidGraph(_) => ErrorCode::AIProviderError,
            GraphError::Storage(_) => ErrorCode::DatabaseError,
        }
    }
}

impl From<GraphValidationError> for GraphError {
    fn from(err: GraphValidationError) -> Self {
        GraphError::InvalidGraph(err.to_string())
    }
}

impl From<DomainError> for GraphError {
    fn from(err: DomainError) -> Self {
        GraphError::Storage(err.to_string())
    }
}

impl From<SessionError> for GraphError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NotFound(code) => GraphError::SessionNotFound(code),
            other => GraphError::Storage(other.to_string()),
        }
    }
}
