//! Foundation module - Shared domain primitives.
//!
//! Identifiers, timestamps, the state machine trait, and the error
//! vocabulary used across the feedback domain.

mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{
    JobId, MessageId, QuestionId, ResponseId, SessionCode, UserId, MAX_SESSION_CODE_LENGTH,
    SESSION_CODE_LENGTH,
};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
