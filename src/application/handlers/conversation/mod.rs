//! Conversation handlers.
//!
//! Everything that reads or changes a participant's conversation: joining,
//! answering, chatting, and reading back state and history.

mod assistant_messages;
mod get_chat_history;
mod initialize_participant;
mod participant_lock;
mod process_turn;
mod state_service;

pub use assistant_messages::{
    Addressee, AssistantMessages, DEFAULT_AI_DEADLINE, DEFAULT_ASSISTANT_NAME,
};
pub use get_chat_history::GetChatHistoryHandler;
pub use initialize_participant::{
    InitializeParticipantCommand, InitializeParticipantHandler, InitializeParticipantResult,
};
pub use participant_lock::ParticipantLocks;
pub use process_turn::{
    ProcessTurnCommand, ProcessTurnHandler, TurnResult, DEFAULT_FOLLOW_UP_DELAY,
};
pub use state_service::ConversationStateService;
