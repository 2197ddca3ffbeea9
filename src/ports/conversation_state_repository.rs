//! Conversation state repository port.
//!
//! One document per (session, participant), replaced on every save.

use crate::domain::conversation::ConversationState;
use crate::domain::foundation::{DomainError, SessionCode, UserId};
use async_trait::async_trait;

#[async_trait]
pub trait ConversationStateRepository: Send + Sync {
    /// Load a participant's state, if it has been created.
    async fn find(
        &self,
        session_code: &SessionCode,
        user_id: &UserId,
    ) -> Result<Option<ConversationState>, DomainError>;

    /// Insert or replace a participant's state.
    async fn save(&self, state: &ConversationState) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversation_state_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn ConversationStateRepository) {}
    }
}
