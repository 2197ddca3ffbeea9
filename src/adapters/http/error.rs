//! Error responses for the HTTP API.
//!
//! Every handler error converts into [`ApiError`], which renders as
//! `{ code, message, details? }` with a 400, 404, or 500 status.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use crate::application::handlers::TranscriptionError;
use crate::domain::conversation::ConversationError;
use crate::domain::foundation::{ErrorCode, ValidationError};
use crate::domain::graph::GraphError;
use crate::domain::session::SessionError;

const INTERNAL_MESSAGE: &str = "An internal error occurred";

/// JSON body of every error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// An error ready to be returned from an axum handler.
#[derive(Debug, Clone)]
pub enum ApiError {
    /// 400
    BadRequest {
        code: ErrorCode,
        message: String,
        details: Option<serde_json::Value>,
    },
    /// 404
    NotFound { code: ErrorCode, message: String },
    /// 500
    Internal {
        code: ErrorCode,
        message: String,
        details: Option<serde_json::Value>,
    },
}

impl ApiError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        ApiError::BadRequest {
            code: ErrorCode::ValidationFailed,
            message: message.into(),
            details: Some(json!({ "field": field })),
        }
    }

    /// Logs `cause` and hides it from the client.
    pub fn internal(code: ErrorCode, cause: impl std::fmt::Display) -> Self {
        error!(code = %code, error = %cause, "Request failed");
        ApiError::Internal {
            code,
            message: INTERNAL_MESSAGE.to_string(),
            details: None,
        }
    }

    /// Logs `cause` and returns it to the client as diagnostic detail.
    pub fn internal_with_detail(code: ErrorCode, message: impl Into<String>, cause: impl std::fmt::Display) -> Self {
        let detail = cause.to_string();
        error!(code = %code, error = %detail, "Request failed");
        ApiError::Internal {
            code,
            message: message.into(),
            details: Some(json!({ "error": detail })),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::BadRequest {
                code,
                message,
                details,
            }
            | ApiError::Internal {
                code,
                message,
                details,
            } => ErrorResponse {
                code: code.to_string(),
                message,
                details,
            },
            ApiError::NotFound { code, message } => ErrorResponse {
                code: code.to_string(),
                message,
                details: None,
            },
        };
        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.field(), err.to_string())
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NotFound(code) => ApiError::NotFound {
                code: ErrorCode::SessionNotFound,
                message: format!("Session not found: {}", code),
            },
            SessionError::ValidationFailed { field, message } => {
                ApiError::validation(&field, message)
            }
            SessionError::Infrastructure(msg) => ApiError::internal(ErrorCode::DatabaseError, msg),
        }
    }
}

impl From<ConversationError> for ApiError {
    fn from(err: ConversationError) -> Self {
        match err {
            ConversationError::SessionNotFound(code) => ApiError::NotFound {
                code: ErrorCode::SessionNotFound,
                message: format!("Session not found: {}", code),
            },
            ConversationError::Validation { field, message } => {
                ApiError::validation(&field, message)
            }
            ConversationError::Storage(msg) => ApiError::internal(ErrorCode::DatabaseError, msg),
        }
    }
}

impl From<GraphError> for ApiError {
    fn from(err: GraphError) -> Self {
        let code = err.code();
        match err {
            GraphError::SessionNotFound(session) => ApiError::NotFound {
                code,
                message: format!("Session not found: {}", session),
            },
            GraphError::NoResponses(session) => ApiError::NotFound {
                code,
                message: format!("No responses found for session {}", session),
            },
            GraphError::AIProvider(cause) => {
                ApiError::internal_with_detail(code, "Failed to generate graph", cause)
            }
            GraphError::InvalidGraph(cause) => {
                ApiError::internal_with_detail(code, "Generated graph failed validation", cause)
            }
            GraphError::Storage(msg) => ApiError::internal(code, msg),
        }
    }
}

impl From<TranscriptionError> for ApiError {
    fn from(err: TranscriptionError) -> Self {
        match err {
            TranscriptionError::EmptyAudio => ApiError::BadRequest {
                code: ErrorCode::ValidationFailed,
                message: err.to_string(),
                details: Some(json!({ "field": "audio" })),
            },
            TranscriptionError::AIProvider(cause) => ApiError::internal_with_detail(
                ErrorCode::AIProviderError,
                "Failed to transcribe audio",
                cause,
            ),
        }
    }
}
