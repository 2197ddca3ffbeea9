//! Session module - admin-defined feedback rounds.

mod aggregate;
mod errors;

pub use aggregate::{Question, Session, MAX_NAME_LENGTH, MAX_QUESTION_LENGTH};
pub use errors::SessionError;
