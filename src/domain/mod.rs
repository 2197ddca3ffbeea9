//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `session` - Admin-defined feedback sessions and their questions
//! - `conversation` - Participant state machine, decisions, transcripts
//! - `graph` - Idea graph model, validation, and corpus assembly

pub mod conversation;
pub mod foundation;
pub mod graph;
pub mod session;
