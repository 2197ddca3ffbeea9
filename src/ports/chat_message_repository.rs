//! Chat message repository port.
//!
//! Implementations keep at most
//! [`MAX_MESSAGES_PER_PARTICIPANT`](crate::domain::conversation::MAX_MESSAGES_PER_PARTICIPANT)
//! messages per (session, participant), evicting the oldest on insert.

use crate::domain::conversation::ChatMessage;
use crate::domain::foundation::{DomainError, SessionCode, UserId};
use async_trait::async_trait;

#[async_trait]
pub trait ChatMessageRepository: Send + Sync {
    /// Append a message, evicting the oldest ones beyond the retention cap.
    async fn append(&self, message: &ChatMessage) -> Result<(), DomainError>;

    /// A participant's retained transcript, ordered by timestamp ascending.
    async fn find_by_participant(
        &self,
        session_code: &SessionCode,
        user_id: &UserId,
    ) -> Result<Vec<ChatMessage>, DomainError>;
}
