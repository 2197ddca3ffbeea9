//! Request and response bodies for session endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;
use crate::domain::session::{Question, Session};

/// Request to create a session.
///
/// Both fields default so that a missing field is reported as a validation
/// failure rather than a JSON rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateSessionRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub questions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionResponse {
    pub id: String,
    pub text: String,
    pub order: usize,
}

impl From<&Question> for QuestionResponse {
    fn from(question: &Question) -> Self {
        Self {
            id: question.id.to_string(),
            text: question.text.clone(),
            order: question.order,
        }
    }
}

/// A session as returned to the admin and participant clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    /// The session code.
    pub id: String,
    pub name: String,
    pub questions: Vec<QuestionResponse>,
    pub created_at: Timestamp,
}

impl From<&Session> for SessionResponse {
    fn from(session: &Session) -> Self {
        Self {
            id: session.code().to_string(),
            name: session.name().to_string(),
            questions: session.questions().iter().map(QuestionResponse::from).collect(),
            created_at: *session.created_at(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::SessionCode;
    use serde_json::json;

    #[test]
    fn create_request_tolerates_missing_fields() {
        let req: CreateSessionRequest = serde_json::from_value(json!({})).unwrap();
        assert!(req.name.is_empty());
        assert!(req.questions.is_empty());
    }

    #[test]
    fn session_response_uses_code_as_id() {
        let session = Session::new(
            SessionCode::parse("RETRO1").unwrap(),
            "Retro",
            vec!["What went well?".to_string()],
        )
        .unwrap();
        let body = serde_json::to_value(SessionResponse::from(&session)).unwrap();

        assert_eq!(body["id"], json!(session.code().as_str()));
        assert_eq!(body["questions"][0]["order"], json!(0));
        assert!(body.get("createdAt").is_some());
    }
}
