//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.

pub mod handlers;

pub use handlers::{
    // Session handlers
    CreateSessionCommand, CreateSessionHandler, GetSessionHandler, ListSessionsHandler,
    // Conversation handlers
    AssistantMessages, ConversationStateService, GetChatHistoryHandler,
    InitializeParticipantCommand, InitializeParticipantHandler, InitializeParticipantResult,
    ParticipantLocks, ProcessTurnCommand, ProcessTurnHandler, TurnResult,
    // Graph and audio handlers
    GenerateGraphHandler, GraphResult, TranscribeAudioHandler, TranscriptionError,
};
