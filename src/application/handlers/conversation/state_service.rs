//! ConversationStateService - get and update per-participant state.
//!
//! State is created lazily: the first read for a participant persists the
//! initial state for the session.

use std::sync::Arc;

use crate::domain::conversation::{ConversationError, ConversationState, ConversationStateUpdate};
use crate::domain::foundation::{SessionCode, UserId};
use crate::domain::session::Session;
use crate::ports::{ConversationStateRepository, SessionRepository};

/// Reads and writes conversation state documents.
#[derive(Clone)]
pub struct ConversationStateService {
    sessions: Arc<dyn SessionRepository>,
    states: Arc<dyn ConversationStateRepository>,
}

impl ConversationStateService {
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        states: Arc<dyn ConversationStateRepository>,
    ) -> Self {
        Self { sessions, states }
    }

    /// Returns the participant's state, creating and persisting the initial
    /// state on first access.
    pub async fn get(
        &self,
        session_code: &SessionCode,
        user_id: &UserId,
    ) -> Result<ConversationState, ConversationError> {
        let session = self.load_session(session_code).await?;
        self.load_or_init(&session, user_id).await
    }

    /// Merges `update` into the current (or initial) state and persists it.
    pub async fn update(
        &self,
        session_code: &SessionCode,
        user_id: &UserId,
        update: ConversationStateUpdate,
    ) -> Result<ConversationState, ConversationError> {
        let session = self.load_session(session_code).await?;
        let mut state = self.find_or_initial(&session, user_id).await?;

        state.merge(update)?;
        state.check_against(&session)?;
        self.save(&mut state).await?;

        Ok(state)
    }

    pub(crate) async fn load_session(
        &self,
        session_code: &SessionCode,
    ) -> Result<Session, ConversationError> {
        self.sessions
            .find_by_code(session_code)
            .await?
            .ok_or_else(|| ConversationError::SessionNotFound(session_code.clone()))
    }

    pub(crate) async fn load_or_init(
        &self,
        session: &Session,
        user_id: &UserId,
    ) -> Result<ConversationState, ConversationError> {
        if let Some(state) = self.states.find(session.code(), user_id).await? {
            return Ok(state);
        }
        let mut state =
            ConversationState::initial(session.code().clone(), user_id.clone(), session.question_count());
        self.save(&mut state).await?;
        Ok(state)
    }

    /// Stamps and persists a changed state.
    pub(crate) async fn save(&self, state: &mut ConversationState) -> Result<(), ConversationError> {
        state.touch();
        self.states.save(state).await?;
        Ok(())
    }

    async fn find_or_initial(
        &self,
        session: &Session,
        user_id: &UserId,
    ) -> Result<ConversationState, ConversationError> {
        Ok(self
            .states
            .find(session.code(), user_id)
            .await?
            .unwrap_or_else(|| {
                ConversationState::initial(
                    session.code().clone(),
                    user_id.clone(),
                    session.question_count(),
                )
            }))
    }
}
