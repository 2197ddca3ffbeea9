//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## AI
//!
//! - `AIProvider` - Text generation, structured output, transcription
//!
//! ## Storage
//!
//! - `SessionRepository` - Sessions by code
//! - `ResponseRepository` - Append-only structured answers
//! - `ChatMessageRepository` - Capped per-participant transcripts
//! - `ConversationStateRepository` - Per-participant progress documents
//!
//! ## Scheduling
//!
//! - `MessageScheduler` - Delayed follow-up jobs

mod ai_provider;
mod chat_message_repository;
mod conversation_state_repository;
mod message_scheduler;
mod response_repository;
mod session_repository;

pub use ai_provider::{
    AIError, AIProvider, AudioInput, CompletionRequest, CompletionResponse, FinishReason, Message,
    MessageRole, RequestMetadata, ResponseSchema, TokenUsage,
};
pub use chat_message_repository::ChatMessageRepository;
pub use conversation_state_repository::ConversationStateRepository;
pub use message_scheduler::MessageScheduler;
pub use response_repository::ResponseRepository;
pub use session_repository::SessionRepository;
