//! Per-participant conversation state.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::{ConversationPhase, DecisionOutcome};
use crate::domain::foundation::{
    QuestionId, SessionCode, StateMachine, Timestamp, UserId, ValidationError,
};
use crate::domain::session::Session;

/// Progress of one participant through one session.
///
/// # Invariants
///
/// - while `question_mode` is true, `current_question_index` indexes a
///   question of the session
/// - `current_question_index` never decreases
/// - once `question_mode` is false it never becomes true again
/// - `completed_question_ids` only grows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationState {
    session_code: SessionCode,
    user_id: UserId,
    current_question_index: usize,
    question_mode: bool,
    completed_question_ids: BTreeSet<QuestionId>,
    last_updated: Timestamp,

    /// Incremented on every persisted change.
    #[serde(default)]
    version: u64,
}

/// Partial changes merged into a [`ConversationState`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationStateUpdate {
    pub current_question_index: Option<usize>,
    pub question_mode: Option<bool>,

    /// Added to the completed set; existing entries are kept.
    pub completed_question_ids: Vec<QuestionId>,
}

impl ConversationStateUpdate {
    pub fn is_empty(&self) -> bool {
        self.current_question_index.is_none()
            && self.question_mode.is_none()
            && self.completed_question_ids.is_empty()
    }
}

/// What a decision did to a participant's progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Still on the same question, or already chatting.
    Stayed,
    /// Moved on to the question at `next_index`.
    Advanced { next_index: usize },
    /// Left question mode.
    Finished,
}

impl ConversationState {
    /// Fresh state for a participant joining a session.
    pub fn initial(session_code: SessionCode, user_id: UserId, question_count: usize) -> Self {
        Self {
            session_code,
            user_id,
            current_question_index: 0,
            question_mode: ConversationPhase::initial(question_count).is_questioning(),
            completed_question_ids: BTreeSet::new(),
            last_updated: Timestamp::now(),
            version: 0,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn session_code(&self) -> &SessionCode {
        &self.session_code
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn current_question_index(&self) -> usize {
        self.current_question_index
    }

    pub fn question_mode(&self) -> bool {
        self.question_mode
    }

    pub fn completed_question_ids(&self) -> &BTreeSet<QuestionId> {
        &self.completed_question_ids
    }

    pub fn last_updated(&self) -> &Timestamp {
        &self.last_updated
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// The state viewed as a phase of the state machine.
    pub fn phase(&self) -> ConversationPhase {
        if self.question_mode {
            ConversationPhase::Questioning(self.current_question_index)
        } else {
            ConversationPhase::Chatting
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Merges partial changes, refusing any that would move backwards.
    ///
    /// # Errors
    ///
    /// - `InvalidFormat` if the index would decrease
    /// - `InvalidFormat` if question mode would be re-entered
    pub fn merge(&mut self, update: ConversationStateUpdate) -> Result<(), ValidationError> {
        if let Some(index) = update.current_question_index {
            if index < self.current_question_index {
                return Err(ValidationError::invalid_format(
                    "current_question_index",
                    format!(
                        "cannot move back from {} to {}",
                        self.current_question_index, index
                    ),
                ));
            }
        }
        if update.question_mode == Some(true) && !self.question_mode {
            return Err(ValidationError::invalid_format(
                "question_mode",
                "chat mode cannot return to question mode",
            ));
        }

        if let Some(index) = update.current_question_index {
            self.current_question_index = index;
        }
        if let Some(mode) = update.question_mode {
            self.question_mode = mode;
        }
        self.completed_question_ids
            .extend(update.completed_question_ids);
        Ok(())
    }

    /// Checks the index invariant against the owning session.
    pub fn check_against(&self, session: &Session) -> Result<(), ValidationError> {
        if self.question_mode && self.current_question_index >= session.question_count() {
            return Err(ValidationError::out_of_range(
                "current_question_index",
                0,
                session.question_count().saturating_sub(1) as i64,
                self.current_question_index as i64,
            ));
        }
        Ok(())
    }

    /// Marks the state as changed: refreshes `last_updated` and bumps the version.
    pub fn touch(&mut self) {
        self.last_updated = Timestamp::now();
        self.version += 1;
    }

    /// Works out the transition a decision causes, without applying it.
    ///
    /// Leaving a question (advance or finish) marks it completed.
    pub fn plan(
        &self,
        outcome: DecisionOutcome,
        session: &Session,
    ) -> (Transition, ConversationStateUpdate) {
        let current = self.phase();
        let next = current.after(outcome, session.question_count());
        if next == current {
            return (Transition::Stayed, ConversationStateUpdate::default());
        }
        let Ok(next) = current.transition_to(next) else {
            return (Transition::Stayed, ConversationStateUpdate::default());
        };

        let completed: Vec<QuestionId> = session
            .question_at(self.current_question_index)
            .map(|q| vec![q.id])
            .unwrap_or_default();

        match next {
            ConversationPhase::Questioning(next_index) => (
                Transition::Advanced { next_index },
                ConversationStateUpdate {
                    current_question_index: Some(next_index),
                    question_mode: None,
                    completed_question_ids: completed,
                },
            ),
            ConversationPhase::Chatting => (
                Transition::Finished,
                ConversationStateUpdate {
                    current_question_index: None,
                    question_mode: Some(false),
                    completed_question_ids: completed,
                },
            ),
        }
    }

    /// Plans and applies a decision in one step.
    pub fn apply_outcome(&mut self, outcome: DecisionOutcome, session: &Session) -> Transition {
        let (transition, update) = self.plan(outcome, session);
        // Planned updates only move forward.
        if self.merge(update).is_err() {
            return Transition::Stayed;
        }
        transition
    }
}
