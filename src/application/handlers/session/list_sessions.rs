//! ListSessionsHandler - Query handler for the admin session list.

use std::sync::Arc;

use crate::domain::session::{Session, SessionError};
use crate::ports::SessionRepository;

/// Handler for listing every session, newest first.
pub struct ListSessionsHandler {
    repository: Arc<dyn SessionRepository>,
}

impl ListSessionsHandler {
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self) -> Result<Vec<Session>, SessionError> {
        Ok(self.repository.list_all().await?)
    }
}
