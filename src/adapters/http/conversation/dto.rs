//! Request and response bodies for participant conversation endpoints.

use serde::{Deserialize, Serialize};

use crate::application::handlers::{InitializeParticipantResult, TurnResult};
use crate::domain::conversation::{ChatMessage, ConversationState, Sender};
use crate::domain::foundation::Timestamp;

// ════════════════════════════════════════════════════════════════════════════
// Requests
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeRequest {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub user_name: String,
}

/// A structured answer to the participant's current question.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponseRequest {
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub user_name: String,
    /// The question the client believes it is answering.
    #[serde(default)]
    pub question_id: Option<String>,
    /// Accepted for compatibility; the stored question text comes from the session.
    #[serde(default)]
    pub question_text: Option<String>,
    #[serde(default)]
    pub response: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub message: String,
}

// ════════════════════════════════════════════════════════════════════════════
// Responses
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessageResponse {
    pub id: String,
    pub session_id: String,
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    pub sender: Sender,
    pub message: String,
    pub timestamp: Timestamp,
}

impl From<&ChatMessage> for ChatMessageResponse {
    fn from(msg: &ChatMessage) -> Self {
        Self {
            id: msg.id.to_string(),
            session_id: msg.session_code.to_string(),
            user_id: msg.user_id.to_string(),
            user_name: msg.user_name.clone(),
            sender: msg.sender,
            message: msg.message.clone(),
            timestamp: msg.timestamp,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationStateResponse {
    pub session_id: String,
    pub user_id: String,
    pub current_question_index: usize,
    pub question_mode: bool,
    pub completed_question_ids: Vec<String>,
    pub last_updated: Timestamp,
    pub version: u64,
}

impl From<&ConversationState> for ConversationStateResponse {
    fn from(state: &ConversationState) -> Self {
        Self {
            session_id: state.session_code().to_string(),
            user_id: state.user_id().to_string(),
            current_question_index: state.current_question_index(),
            question_mode: state.question_mode(),
            completed_question_ids: state
                .completed_question_ids()
                .iter()
                .map(ToString::to_string)
                .collect(),
            last_updated: *state.last_updated(),
            version: state.version(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResponse {
    pub existing: bool,
    pub messages: Vec<ChatMessageResponse>,
    pub conversation_state: ConversationStateResponse,
}

impl From<&InitializeParticipantResult> for InitializeResponse {
    fn from(result: &InitializeParticipantResult) -> Self {
        Self {
            existing: result.is_existing,
            messages: result.messages.iter().map(ChatMessageResponse::from).collect(),
            conversation_state: ConversationStateResponse::from(&result.conversation_state),
        }
    }
}

/// The assistant's reply to a participant turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnResponse {
    pub message: ChatMessageResponse,
    pub conversation_state: ConversationStateResponse,
    /// `continue`, `advance`, or `finish`; absent for chat-mode turns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision: Option<String>,
}

impl From<&TurnResult> for TurnResponse {
    fn from(result: &TurnResult) -> Self {
        Self {
            message: ChatMessageResponse::from(&result.assistant_message),
            conversation_state: ConversationStateResponse::from(&result.conversation_state),
            decision: result.decision.map(|d| d.as_str().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{SessionCode, UserId};
    use serde_json::json;

    #[test]
    fn submit_request_reads_camel_case() {
        let req: SubmitResponseRequest = serde_json::from_value(json!({
            "sessionId": "abc123",
            "userId": "u1",
            "userName": "Ada",
            "questionId": "not-checked-here",
            "response": "Pairing helped"
        }))
        .unwrap();

        assert_eq!(req.session_id, "abc123");
        assert_eq!(req.question_id.as_deref(), Some("not-checked-here"));
        assert!(req.question_text.is_none());
    }

    #[test]
    fn state_response_is_camel_case() {
        let state = ConversationState::initial(
            SessionCode::parse("ABC123").unwrap(),
            UserId::new("u1").unwrap(),
            2,
        );
        let body = serde_json::to_value(ConversationStateResponse::from(&state)).unwrap();

        assert_eq!(body["sessionId"], json!("ABC123"));
        assert_eq!(body["currentQuestionIndex"], json!(0));
        assert_eq!(body["questionMode"], json!(true));
        assert_eq!(body["completedQuestionIds"], json!([]));
    }

    #[test]
    fn assistant_messages_serialize_sender() {
        let msg = ChatMessage::from_assistant(
            SessionCode::parse("ABC123").unwrap(),
            UserId::new("u1").unwrap(),
            "Hello",
        );
        let body = serde_json::to_value(ChatMessageResponse::from(&msg)).unwrap();

        assert_eq!(body["sender"], json!("assistant"));
        assert!(body.get("userName").is_none());
    }
}
