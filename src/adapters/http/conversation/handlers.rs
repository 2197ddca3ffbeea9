//! HTTP handlers for participant conversation endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::adapters::http::error::ApiError;
use crate::application::handlers::{
    ConversationStateService, GetChatHistoryHandler, InitializeParticipantCommand,
    InitializeParticipantHandler, ProcessTurnCommand, ProcessTurnHandler,
};
use crate::domain::foundation::{QuestionId, SessionCode, UserId, ValidationError};

use super::dto::{
    ChatMessageResponse, ChatRequest, ConversationStateResponse, InitializeRequest,
    InitializeResponse, SubmitResponseRequest, TurnResponse,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct ConversationHandlers {
    initialize_handler: Arc<InitializeParticipantHandler>,
    turn_handler: Arc<ProcessTurnHandler>,
    history_handler: Arc<GetChatHistoryHandler>,
    state_service: ConversationStateService,
}

impl ConversationHandlers {
    pub fn new(
        initialize_handler: Arc<InitializeParticipantHandler>,
        turn_handler: Arc<ProcessTurnHandler>,
        history_handler: Arc<GetChatHistoryHandler>,
        state_service: ConversationStateService,
    ) -> Self {
        Self {
            initialize_handler,
            turn_handler,
            history_handler,
            state_service,
        }
    }
}

fn parse_question_id(raw: Option<&str>) -> Result<Option<QuestionId>, ValidationError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => s
            .parse()
            .map(Some)
            .map_err(|_| ValidationError::invalid_format("questionId", "must be a UUID")),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/sessions/:code/initialize
pub async fn initialize_participant(
    State(handlers): State<ConversationHandlers>,
    Path(code): Path<String>,
    Json(req): Json<InitializeRequest>,
) -> Result<Json<InitializeResponse>, ApiError> {
    let cmd = InitializeParticipantCommand {
        session_code: SessionCode::parse(&code)?,
        user_id: UserId::new(req.user_id)?,
        user_name: req.user_name,
    };

    let result = handlers.initialize_handler.handle(cmd).await?;
    Ok(Json(InitializeResponse::from(&result)))
}

/// POST /api/responses
pub async fn submit_response(
    State(handlers): State<ConversationHandlers>,
    Json(req): Json<SubmitResponseRequest>,
) -> Result<(StatusCode, Json<TurnResponse>), ApiError> {
    let cmd = ProcessTurnCommand {
        session_code: SessionCode::parse(&req.session_id)?,
        user_id: UserId::new(req.user_id)?,
        user_name: req.user_name,
        text: req.response,
        question_id: parse_question_id(req.question_id.as_deref())?,
    };

    let result = handlers.turn_handler.handle(cmd).await?;
    Ok((StatusCode::CREATED, Json(TurnResponse::from(&result))))
}

/// POST /api/chat
pub async fn send_chat_message(
    State(handlers): State<ConversationHandlers>,
    Json(req): Json<ChatRequest>,
) -> Result<(StatusCode, Json<TurnResponse>), ApiError> {
    let cmd = ProcessTurnCommand {
        session_code: SessionCode::parse(&req.session_id)?,
        user_id: UserId::new(req.user_id)?,
        user_name: req.user_name,
        text: req.message,
        question_id: None,
    };

    let result = handlers.turn_handler.handle(cmd).await?;
    Ok((StatusCode::CREATED, Json(TurnResponse::from(&result))))
}

/// GET /api/chat/:code/:user_id
pub async fn get_chat_history(
    State(handlers): State<ConversationHandlers>,
    Path((code, user_id)): Path<(String, String)>,
) -> Result<Json<Vec<ChatMessageResponse>>, ApiError> {
    let code = SessionCode::parse(&code)?;
    let user_id = UserId::new(user_id)?;

    let messages = handlers.history_handler.handle(&code, &user_id).await?;
    Ok(Json(messages.iter().map(ChatMessageResponse::from).collect()))
}

/// GET /api/conversation-state/:code/:user_id
pub async fn get_conversation_state(
    State(handlers): State<ConversationHandlers>,
    Path((code, user_id)): Path<(String, String)>,
) -> Result<Json<ConversationStateResponse>, ApiError> {
    let code = SessionCode::parse(&code)?;
    let user_id = UserId::new(user_id)?;

    let state = handlers.state_service.get(&code, &user_id).await?;
    Ok(Json(ConversationStateResponse::from(&state)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_question_id_is_ignored() {
        assert_eq!(parse_question_id(None), Ok(None));
        assert_eq!(parse_question_id(Some("  ")), Ok(None));
    }

    #[test]
    fn malformed_question_id_is_rejected() {
        let err = parse_question_id(Some("q-1")).unwrap_err();
        assert_eq!(err.field(), "questionId");
    }

    #[test]
    fn valid_question_id_parses() {
        let id = QuestionId::new();
        assert_eq!(parse_question_id(Some(&id.to_string())), Ok(Some(id)));
    }
}
