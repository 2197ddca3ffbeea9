//! HTTP routes for session endpoints.

use axum::{routing::get, Router};

use super::handlers::{create_session, get_session, list_sessions, SessionHandlers};

/// Creates the session router with all endpoints.
pub fn session_routes(handlers: SessionHandlers) -> Router {
    Router::new()
        .route("/api/sessions", get(list_sessions).post(create_session))
        .route("/api/sessions/:code", get(get_session))
        .with_state(handlers)
}
