//! Chat transcript and answer records.
//!
//! Chat messages form the durable conversation transcript and are capped per
//! participant. Structured responses are the durable answer record and are
//! never evicted.

use crate::domain::foundation::{
    MessageId, QuestionId, ResponseId, SessionCode, Timestamp, UserId,
};
use serde::{Deserialize, Serialize};

/// Messages retained per (session, participant); oldest are evicted first.
pub const MAX_MESSAGES_PER_PARTICIPANT: usize = 100;

/// Most recent messages sent to the provider as chat context.
pub const CHAT_CONTEXT_LIMIT: usize = 100;

/// Who wrote a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    /// The assistant. Older transcripts stored this as `dot`.
    #[serde(alias = "dot")]
    Assistant,
}

impl Sender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Assistant => "assistant",
        }
    }
}

/// One line of a participant's transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: MessageId,
    pub session_code: SessionCode,
    pub user_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    pub sender: Sender,
    pub message: String,
    pub timestamp: Timestamp,
}

impl ChatMessage {
    /// A message typed (or dictated) by the participant.
    pub fn from_user(
        session_code: SessionCode,
        user_id: UserId,
        user_name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: MessageId::new(),
            session_code,
            user_id,
            user_name: Some(user_name.into()),
            sender: Sender::User,
            message: message.into(),
            timestamp: Timestamp::now(),
        }
    }

    /// A message written by the assistant into the participant's transcript.
    pub fn from_assistant(
        session_code: SessionCode,
        user_id: UserId,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: MessageId::new(),
            session_code,
            user_id,
            user_name: None,
            sender: Sender::Assistant,
            message: message.into(),
            timestamp: Timestamp::now(),
        }
    }

    pub fn is_from_user(&self) -> bool {
        self.sender == Sender::User
    }
}

/// Durable record of one answer to one structured question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredResponse {
    pub id: ResponseId,
    pub session_code: SessionCode,
    pub user_id: UserId,
    pub user_name: String,
    pub question_id: QuestionId,
    pub question_text: String,
    pub response: String,
    pub timestamp: Timestamp,
}

impl StructuredResponse {
    pub fn new(
        session_code: SessionCode,
        user_id: UserId,
        user_name: impl Into<String>,
        question_id: QuestionId,
        question_text: impl Into<String>,
        response: impl Into<String>,
    ) -> Self {
        Self {
            id: ResponseId::new(),
            session_code,
            user_id,
            user_name: user_name.into(),
            question_id,
            question_text: question_text.into(),
            response: response.into(),
            timestamp: Timestamp::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code() -> SessionCode {
        SessionCode::parse("ABC123").unwrap()
    }

    #[test]
    fn legacy_dot_sender_reads_as_assistant() {
        let sender: Sender = serde_json::from_str("\"dot\"").unwrap();
        assert_eq!(sender, Sender::Assistant);
        assert_eq!(serde_json::to_string(&sender).unwrap(), "\"assistant\"");
    }

    #[test]
    fn user_message_carries_display_name() {
        let msg = ChatMessage::from_user(code(), UserId::new("u1").unwrap(), "Ana", "Hi");
        assert!(msg.is_from_user());
        assert_eq!(msg.user_name.as_deref(), Some("Ana"));
    }

    #[test]
    fn assistant_message_omits_user_name_on_the_wire() {
        let msg = ChatMessage::from_assistant(code(), UserId::new("u1").unwrap(), "Hello");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["sender"], "assistant");
        assert!(json.get("userName").is_none());
        assert_eq!(json["sessionCode"], "ABC123");
    }
}
