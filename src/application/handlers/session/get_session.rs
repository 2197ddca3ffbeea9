//! GetSessionHandler - Query handler for a single session.

use std::sync::Arc;

use crate::domain::foundation::SessionCode;
use crate::domain::session::{Session, SessionError};
use crate::ports::SessionRepository;

/// Handler for loading a session by code.
pub struct GetSessionHandler {
    repository: Arc<dyn SessionRepository>,
}

impl GetSessionHandler {
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, code: &SessionCode) -> Result<Session, SessionError> {
        self.repository
            .find_by_code(code)
            .await?
            .ok_or_else(|| SessionError::not_found(code.clone()))
    }
}
