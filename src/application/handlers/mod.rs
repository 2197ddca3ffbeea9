//! Application handlers.
//!
//! One handler per operation. Handlers depend only on ports and are wired
//! with concrete adapters at startup.

pub mod audio;
pub mod conversation;
pub mod graph;
pub mod session;

pub use audio::{TranscribeAudioHandler, TranscriptionError};
pub use conversation::{
    Addressee, AssistantMessages, ConversationStateService, GetChatHistoryHandler,
    InitializeParticipantCommand, InitializeParticipantHandler, InitializeParticipantResult,
    ParticipantLocks, ProcessTurnCommand, ProcessTurnHandler, TurnResult,
    DEFAULT_AI_DEADLINE, DEFAULT_ASSISTANT_NAME, DEFAULT_FOLLOW_UP_DELAY,
};
pub use graph::{GenerateGraphHandler, GraphResult};
pub use session::{
    CreateSessionCommand, CreateSessionHandler, GetSessionHandler, ListSessionsHandler,
};
