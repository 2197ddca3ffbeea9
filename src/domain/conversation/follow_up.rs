//! Deferred assistant messages.
//!
//! After an answer moves a participant on, the next question (or a closing
//! thank-you) is posted a short while later by a background worker. Each
//! such message is a job with a not-before time.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{JobId, SessionCode, Timestamp, UserId};

/// What a follow-up job should post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FollowUpKind {
    /// Ask the next question, rephrased conversationally.
    NextQuestion {
        question_text: String,
        /// One-based position of the question.
        position: usize,
        total: usize,
    },
    /// Thank the participant for finishing all questions.
    Completion,
}

/// A follow-up message waiting to be generated and posted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledMessage {
    pub id: JobId,
    pub session_code: SessionCode,
    pub session_name: String,
    pub user_id: UserId,
    pub user_name: String,
    pub kind: FollowUpKind,
    pub not_before: Timestamp,
}

impl ScheduledMessage {
    pub fn new(
        session_code: SessionCode,
        session_name: impl Into<String>,
        user_id: UserId,
        user_name: impl Into<String>,
        kind: FollowUpKind,
        not_before: Timestamp,
    ) -> Self {
        Self {
            id: JobId::new(),
            session_code,
            session_name: session_name.into(),
            user_id,
            user_name: user_name.into(),
            kind,
            not_before,
        }
    }

    /// True once `now` has reached the job's not-before time.
    pub fn is_due(&self, now: &Timestamp) -> bool {
        !self.not_before.is_after(now)
    }
}
