//! Session command and query handlers.

mod create_session;
mod get_session;
mod list_sessions;

pub use create_session::{CreateSessionCommand, CreateSessionHandler, MAX_CODE_ATTEMPTS};
pub use get_session::GetSessionHandler;
pub use list_sessions::ListSessionsHandler;
