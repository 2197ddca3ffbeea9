//! Session aggregate entity.
//!
//! A session is an admin-defined feedback round: a display name plus an
//! ordered list of questions that every participant is walked through.
//! Sessions are immutable once created.

use crate::domain::foundation::{QuestionId, SessionCode, Timestamp};
use serde::{Deserialize, Serialize};

use super::SessionError;

/// Maximum length for a session name.
pub const MAX_NAME_LENGTH: usize = 500;

/// Maximum length for a single question text.
pub const MAX_QUESTION_LENGTH: usize = 2_000;

/// A question embedded in a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Stable identifier, referenced from answers and completion sets.
    pub id: QuestionId,

    /// The literal question text as the admin wrote it.
    pub text: String,

    /// Zero-based position within the session.
    pub order: usize,
}

/// Session aggregate.
///
/// # Invariants
///
/// - `code` is unique across sessions (checked by the creating handler)
/// - `name` is 1-500 characters after trimming
/// - question `order` values are `0..questions.len()` in sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    code: SessionCode,
    name: String,
    questions: Vec<Question>,
    created_at: Timestamp,
}

impl Session {
    /// Create a new session from raw admin input.
    ///
    /// Question texts are trimmed and blank entries dropped before the
    /// "at least one question" rule is applied.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the name is empty or too long
    /// - `ValidationFailed` if no non-blank question remains
    pub fn new(
        code: SessionCode,
        name: impl Into<String>,
        question_texts: Vec<String>,
    ) -> Result<Self, SessionError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(SessionError::validation("name", "Session name is required"));
        }
        if name.chars().count() > MAX_NAME_LENGTH {
            return Err(SessionError::validation(
                "name",
                format!("Session name must be at most {} characters", MAX_NAME_LENGTH),
            ));
        }

        let texts: Vec<String> = question_texts
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();

        if texts.is_empty() {
            return Err(SessionError::validation(
                "questions",
                "At least one question is required",
            ));
        }
        if let Some(too_long) = texts
            .iter()
            .position(|t| t.chars().count() > MAX_QUESTION_LENGTH)
        {
            return Err(SessionError::validation(
                "questions",
                format!(
                    "Question {} exceeds {} characters",
                    too_long + 1,
                    MAX_QUESTION_LENGTH
                ),
            ));
        }

        let questions = texts
            .into_iter()
            .enumerate()
            .map(|(order, text)| Question {
                id: QuestionId::new(),
                text,
                order,
            })
            .collect();

        Ok(Self {
            code,
            name,
            questions,
            created_at: Timestamp::now(),
        })
    }

    /// Reconstitute a session from persistence (no validation).
    pub fn reconstitute(
        code: SessionCode,
        name: String,
        questions: Vec<Question>,
        created_at: Timestamp,
    ) -> Self {
        Self {
            code,
            name,
            questions,
            created_at,
        }
    }

    /// The same session under a different code, used when a generated code collides.
    pub fn with_code(mut self, code: SessionCode) -> Self {
        self.code = code;
        self
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns the session code.
    pub fn code(&self) -> &SessionCode {
        &self.code
    }

    /// Returns the display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the questions in order.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    /// Returns the question at `index`, if any.
    pub fn question_at(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    /// Looks up a question by id.
    pub fn find_question(&self, id: &QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| &q.id == id)
    }

    /// Returns when the session was created.
    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code() -> SessionCode {
        SessionCode::parse("RETRO1").unwrap()
    }

    #[test]
    fn new_assigns_sequential_orders() {
        let session = Session::new(
            code(),
            "Sprint Retro",
            vec!["What went well?".into(), "What should change?".into()],
        )
        .unwrap();

        assert_eq!(session.name(), "Sprint Retro");
        assert_eq!(session.question_count(), 2);
        assert_eq!(session.questions()[0].order, 0);
        assert_eq!(session.questions()[1].order, 1);
        assert_eq!(session.questions()[1].text, "What should change?");
    }

    #[test]
    fn new_filters_blank_questions_before_validation() {
        let session = Session::new(
            code(),
            "Retro",
            vec!["  ".into(), " First ".into(), "".into(), "Second".into()],
        )
        .unwrap();

        let texts: Vec<_> = session.questions().iter().map(|q| q.text.as_str()).collect();
        assert_eq!(texts, vec!["First", "Second"]);
        assert_eq!(session.questions()[1].order, 1);
    }

    #[test]
    fn new_rejects_blank_name() {
        let err = Session::new(code(), "   ", vec!["Q".into()]).unwrap_err();
        assert!(matches!(err, SessionError::ValidationFailed { ref field, .. } if field == "name"));
    }

    #[test]
    fn new_rejects_only_blank_questions() {
        let err = Session::new(code(), "Retro", vec![" ".into(), "".into()]).unwrap_err();
        assert!(
            matches!(err, SessionError::ValidationFailed { ref field, .. } if field == "questions")
        );
    }

    #[test]
    fn new_rejects_overlong_name() {
        let name = "x".repeat(MAX_NAME_LENGTH + 1);
        assert!(Session::new(code(), name, vec!["Q".into()]).is_err());
    }

    #[test]
    fn question_ids_are_unique_and_findable() {
        let session =
            Session::new(code(), "Retro", vec!["A".into(), "B".into(), "C".into()]).unwrap();
        let ids: std::collections::HashSet<_> =
            session.questions().iter().map(|q| q.id).collect();
        assert_eq!(ids.len(), 3);

        let second = session.questions()[1].id;
        assert_eq!(session.find_question(&second).unwrap().text, "B");
        assert!(session.find_question(&QuestionId::new()).is_none());
    }

    #[test]
    fn reconstitute_allows_zero_questions() {
        let session = Session::reconstitute(code(), "Open chat".into(), vec![], Timestamp::now());
        assert_eq!(session.question_count(), 0);
        assert!(session.question_at(0).is_none());
    }
}
