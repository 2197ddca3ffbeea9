//! HTTP adapter for participant conversation endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    ChatMessageResponse, ChatRequest, ConversationStateResponse, InitializeRequest,
    InitializeResponse, SubmitResponseRequest, TurnResponse,
};
pub use handlers::ConversationHandlers;
pub use routes::conversation_routes;
