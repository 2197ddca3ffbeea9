//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresFeedbackStore` - JSONB document store for sessions, answers,
//!   transcripts, and conversation state

mod feedback_store;

pub use feedback_store::PostgresFeedbackStore;
