//! GetChatHistoryHandler - a participant's transcript, oldest first.

use std::sync::Arc;

use super::ConversationStateService;
use crate::domain::conversation::{ChatMessage, ConversationError};
use crate::domain::foundation::{SessionCode, UserId};
use crate::ports::ChatMessageRepository;

pub struct GetChatHistoryHandler {
    messages: Arc<dyn ChatMessageRepository>,
    states: ConversationStateService,
}

impl GetChatHistoryHandler {
    pub fn new(messages: Arc<dyn ChatMessageRepository>, states: ConversationStateService) -> Self {
        Self { messages, states }
    }

    pub async fn handle(
        &self,
        session_code: &SessionCode,
        user_id: &UserId,
    ) -> Result<Vec<ChatMessage>, ConversationError> {
        let session = self.states.load_session(session_code).await?;
        Ok(self
            .messages
            .find_by_participant(session.code(), user_id)
            .await?)
    }
}
