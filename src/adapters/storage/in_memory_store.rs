//! In-Memory Feedback Store
//!
//! Keeps sessions, answers, transcripts, and conversation state in process
//! memory. Contents live exactly as long as the process. Used for local
//! development and in tests.

use async_trait::async_trait;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::conversation::{
    ChatMessage, ConversationState, StructuredResponse, MAX_MESSAGES_PER_PARTICIPANT,
};
use crate::domain::foundation::{DomainError, SessionCode, UserId};
use crate::domain::session::Session;
use crate::ports::{
    ChatMessageRepository, ConversationStateRepository, ResponseRepository, SessionRepository,
};

type ParticipantKey = (SessionCode, UserId);

/// In-memory implementation of every storage port.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFeedbackStore {
    sessions: Arc<RwLock<HashMap<SessionCode, Session>>>,
    responses: Arc<RwLock<Vec<StructuredResponse>>>,
    messages: Arc<RwLock<HashMap<ParticipantKey, VecDeque<ChatMessage>>>>,
    states: Arc<RwLock<HashMap<ParticipantKey, ConversationState>>>,
}

impl InMemoryFeedbackStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn response_count(&self) -> usize {
        self.responses.read().await.len()
    }

    pub async fn state_count(&self) -> usize {
        self.states.read().await.len()
    }
}

fn key(session_code: &SessionCode, user_id: &UserId) -> ParticipantKey {
    (session_code.clone(), user_id.clone())
}

#[async_trait]
impl SessionRepository for InMemoryFeedbackStore {
    async fn insert(&self, session: &Session) -> Result<bool, DomainError> {
        match self.sessions.write().await.entry(session.code().clone()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(session.clone());
                Ok(true)
            }
        }
    }

    async fn find_by_code(&self, code: &SessionCode) -> Result<Option<Session>, DomainError> {
        Ok(self.sessions.read().await.get(code).cloned())
    }

    async fn exists(&self, code: &SessionCode) -> Result<bool, DomainError> {
        Ok(self.sessions.read().await.contains_key(code))
    }

    async fn list_all(&self) -> Result<Vec<Session>, DomainError> {
        let mut sessions: Vec<Session> = self.sessions.read().await.values().cloned().collect();
        sessions.sort_by(|a, b| b.created_at().cmp(a.created_at()));
        Ok(sessions)
    }
}

#[async_trait]
impl ResponseRepository for InMemoryFeedbackStore {
    async fn append(&self, response: &StructuredResponse) -> Result<(), DomainError> {
        self.responses.write().await.push(response.clone());
        Ok(())
    }

    async fn find_by_session(
        &self,
        session_code: &SessionCode,
    ) -> Result<Vec<StructuredResponse>, DomainError> {
        Ok(self
            .responses
            .read()
            .await
            .iter()
            .filter(|r| &r.session_code == session_code)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ChatMessageRepository for InMemoryFeedbackStore {
    async fn append(&self, message: &ChatMessage) -> Result<(), DomainError> {
        let mut messages = self.messages.write().await;
        let transcript = messages
            .entry(key(&message.session_code, &message.user_id))
            .or_default();

        let out_of_order = transcript
            .back()
            .map(|last| message.timestamp < last.timestamp)
            .unwrap_or(false);
        transcript.push_back(message.clone());
        if out_of_order {
            transcript
                .make_contiguous()
                .sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        }

        while transcript.len() > MAX_MESSAGES_PER_PARTICIPANT {
            transcript.pop_front();
        }
        Ok(())
    }

    async fn find_by_participant(
        &self,
        session_code: &SessionCode,
        user_id: &UserId,
    ) -> Result<Vec<ChatMessage>, DomainError> {
        Ok(self
            .messages
            .read()
            .await
            .get(&key(session_code, user_id))
            .map(|t| t.iter().cloned().collect())
            .unwrap_or_default())
    }
}

#[async_trait]
impl ConversationStateRepository for InMemoryFeedbackStore {
    async fn find(
        &self,
        session_code: &SessionCode,
        user_id: &UserId,
    ) -> Result<Option<ConversationState>, DomainError> {
        Ok(self
            .states
            .read()
            .await
            .get(&key(session_code, user_id))
            .cloned())
    }

    async fn save(&self, state: &ConversationState) -> Result<(), DomainError> {
        self.states
            .write()
            .await
            .insert(key(state.session_code(), state.user_id()), state.clone());
        Ok(())
    }
}
