//! Conversation domain module.
//!
//! Per-participant progress through a session's questions, the decision
//! protocol that drives it, transcript records, deferred follow-ups, and
//! the prompts used for every assistant utterance.

mod decision;
mod errors;
mod follow_up;
mod message;
mod phase;
pub mod prompts;
mod state;

pub use decision::{
    DecisionOutcome, TurnDecision, DECISION_FALLBACK_REPLY, DECISION_SCHEMA_NAME,
};
pub use errors::ConversationError;
pub use follow_up::{FollowUpKind, ScheduledMessage};
pub use message::{
    ChatMessage, Sender, StructuredResponse, CHAT_CONTEXT_LIMIT, MAX_MESSAGES_PER_PARTICIPANT,
};
pub use phase::ConversationPhase;
pub use state::{ConversationState, ConversationStateUpdate, Transition};
