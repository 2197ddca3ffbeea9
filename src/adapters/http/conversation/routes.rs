//! HTTP routes for participant conversation endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    get_chat_history, get_conversation_state, initialize_participant, send_chat_message,
    submit_response, ConversationHandlers,
};

/// Creates the conversation router with all endpoints.
pub fn conversation_routes(handlers: ConversationHandlers) -> Router {
    Router::new()
        .route("/api/sessions/:code/initialize", post(initialize_participant))
        .route("/api/responses", post(submit_response))
        .route("/api/chat", post(send_chat_message))
        .route("/api/chat/:code/:user_id", get(get_chat_history))
        .route(
            "/api/conversation-state/:code/:user_id",
            get(get_conversation_state),
        )
        .with_state(handlers)
}
