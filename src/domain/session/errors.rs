//! Session-specific error types.

use crate::domain::foundation::{DomainError, ErrorCode, SessionCode, ValidationError};
use thiserror::Error;

/// Session-specific errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Session was not found.
    #[error("Session not found: {0}")]
    NotFound(SessionCode),

    /// Validation failed.
    #[error("Validation failed for '{field}': {message}")]
    ValidationFailed { field: String, message: String },

    /// Infrastructure error.
    #[error("Storage error: {0}")]
    Infrastructure(String),
}

impl SessionError {
    pub fn not_found(code: SessionCode) -> Self {
        SessionError::NotFound(code)
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        SessionError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        SessionError::Infrastructure(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            SessionError::NotFound(_) => ErrorCode::SessionNotFound,
            SessionError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            SessionError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }
}

impl From<DomainError> for SessionError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed => SessionError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            _ => SessionError::Infrastructure(err.to_string()),
        }
    }
}

impl From<ValidationError> for SessionError {
    fn from(err: ValidationError) -> Self {
        SessionError::ValidationFailed {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_includes_code() {
        let err = SessionError::not_found(SessionCode::parse("ABC123").unwrap());
        assert_eq!(err.to_string(), "Session not found: ABC123");
        assert_eq!(err.code(), ErrorCode::SessionNotFound);
    }

    #[test]
    fn database_domain_error_maps_to_infrastructure() {
        let err: SessionError = DomainError::database("connection reset").into();
        assert!(matches!(err, SessionError::Infrastructure(_)));
        assert_eq!(err.code(), ErrorCode::DatabaseError);
    }

    #[test]
    fn validation_domain_error_keeps_field() {
        let err: SessionError = DomainError::validation("name", "required").into();
        assert_eq!(
            err,
            SessionError::ValidationFailed {
                field: "name".into(),
                message: "required".into()
            }
        );
    }
}
