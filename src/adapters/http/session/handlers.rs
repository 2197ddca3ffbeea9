//! HTTP handlers for session endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::adapters::http::error::ApiError;
use crate::application::handlers::session::{
    CreateSessionCommand, CreateSessionHandler, GetSessionHandler, ListSessionsHandler,
};
use crate::domain::foundation::SessionCode;

use super::dto::{CreateSessionRequest, SessionResponse};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct SessionHandlers {
    create_handler: Arc<CreateSessionHandler>,
    get_handler: Arc<GetSessionHandler>,
    list_handler: Arc<ListSessionsHandler>,
}

impl SessionHandlers {
    pub fn new(
        create_handler: Arc<CreateSessionHandler>,
        get_handler: Arc<GetSessionHandler>,
        list_handler: Arc<ListSessionsHandler>,
    ) -> Self {
        Self {
            create_handler,
            get_handler,
            list_handler,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/sessions
pub async fn create_session(
    State(handlers): State<SessionHandlers>,
    Json(req): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    let cmd = CreateSessionCommand {
        name: req.name,
        questions: req.questions,
    };

    let session = handlers.create_handler.handle(cmd).await?;
    Ok((StatusCode::CREATED, Json(SessionResponse::from(&session))))
}

/// GET /api/sessions
pub async fn list_sessions(
    State(handlers): State<SessionHandlers>,
) -> Result<Json<Vec<SessionResponse>>, ApiError> {
    let sessions = handlers.list_handler.handle().await?;
    Ok(Json(sessions.iter().map(SessionResponse::from).collect()))
}

/// GET /api/sessions/:code
pub async fn get_session(
    State(handlers): State<SessionHandlers>,
    Path(code): Path<String>,
) -> Result<Json<SessionResponse>, ApiError> {
    let code = SessionCode::parse(&code)?;
    let session = handlers.get_handler.handle(&code).await?;
    Ok(Json(SessionResponse::from(&session)))
}
