//! Conversation phases for a single participant.
//!
//! A participant is either being walked through the session's questions or
//! has moved on to free-form chat. Chat is terminal.

use serde::{Deserialize, Serialize};

use super::DecisionOutcome;
use crate::domain::foundation::StateMachine;

/// Where a participant currently is in a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "phase", content = "questionIndex", rename_all = "snake_case")]
pub enum ConversationPhase {
    /// Answering the question at the given zero-based index.
    Questioning(usize),

    /// Free-form chat after all questions are resolved.
    Chatting,
}

impl ConversationPhase {
    /// Phase on first contact with a session of `question_count` questions.
    pub fn initial(question_count: usize) -> Self {
        if question_count > 0 {
            Self::Questioning(0)
        } else {
            Self::Chatting
        }
    }

    /// Returns the active question index, if still questioning.
    pub fn question_index(&self) -> Option<usize> {
        match self {
            Self::Questioning(i) => Some(*i),
            Self::Chatting => None,
        }
    }

    pub fn is_questioning(&self) -> bool {
        matches!(self, Self::Questioning(_))
    }

    /// Computes the phase that follows a decision outcome.
    ///
    /// An `Advance` past the last question finishes the questionnaire.
    /// Chatting ignores every outcome.
    pub fn after(self, outcome: DecisionOutcome, question_count: usize) -> Self {
        match (self, outcome) {
            (Self::Chatting, _) => Self::Chatting,
            (Self::Questioning(i), DecisionOutcome::Continue) => Self::Questioning(i),
            (Self::Questioning(i), DecisionOutcome::Advance) if i + 1 < question_count => {
                Self::Questioning(i + 1)
            }
            (Self::Questioning(_), DecisionOutcome::Advance | DecisionOutcome::Finish) => {
                Self::Chatting
            }
        }
    }
}

impl StateMachine for ConversationPhase {
    fn can_transition_to(&self, target: &Self) -> bool {
        match (self, target) {
            (Self::Questioning(i), Self::Questioning(j)) => *j == *i || *j == *i + 1,
            (Self::Questioning(_), Self::Chatting) => true,
            (Self::Chatting, _) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn initial_depends_on_question_count() {
        assert_eq!(ConversationPhase::initial(3), ConversationPhase::Questioning(0));
        assert_eq!(ConversationPhase::initial(0), ConversationPhase::Chatting);
    }

    #[test]
    fn continue_stays_on_question() {
        let phase = ConversationPhase::Questioning(1);
        assert_eq!(phase.after(DecisionOutcome::Continue, 3), phase);
    }

    #[test]
    fn advance_moves_to_next_question() {
        assert_eq!(
            ConversationPhase::Questioning(0).after(DecisionOutcome::Advance, 2),
            ConversationPhase::Questioning(1)
        );
    }

    #[test]
    fn advance_past_last_question_finishes() {
        assert_eq!(
            ConversationPhase::Questioning(1).after(DecisionOutcome::Advance, 2),
            ConversationPhase::Chatting
        );
    }

    #[test]
    fn finish_goes_to_chatting_from_any_question() {
        assert_eq!(
            ConversationPhase::Questioning(0).after(DecisionOutcome::Finish, 5),
            ConversationPhase::Chatting
        );
    }

    #[test]
    fn chatting_is_terminal() {
        assert!(!ConversationPhase::Chatting.can_transition_to(&ConversationPhase::Chatting));
        assert!(!ConversationPhase::Chatting.can_transition_to(&ConversationPhase::Questioning(0)));
        for outcome in [
            DecisionOutcome::Continue,
            DecisionOutcome::Advance,
            DecisionOutcome::Finish,
        ] {
            assert_eq!(
                ConversationPhase::Chatting.after(outcome, 4),
                ConversationPhase::Chatting
            );
        }
    }

    #[test]
    fn serializes_with_phase_tag() {
        let json = serde_json::to_value(ConversationPhase::Questioning(2)).unwrap();
        assert_eq!(json["phase"], "questioning");
        assert_eq!(json["questionIndex"], 2);

        let json = serde_json::to_value(ConversationPhase::Chatting).unwrap();
        assert_eq!(json["phase"], "chatting");
    }

    fn outcome_strategy() -> impl Strategy<Value = DecisionOutcome> {
        prop_oneof![
            Just(DecisionOutcome::Continue),
            Just(DecisionOutcome::Advance),
            Just(DecisionOutcome::Finish),
        ]
    }

    proptest! {
        #[test]
        fn every_step_is_a_valid_transition(
            question_count in 1usize..8,
            outcomes in prop::collection::vec(outcome_strategy(), 0..20),
        ) {
            let mut phase = ConversationPhase::initial(question_count);
            for outcome in outcomes {
                let next = phase.after(outcome, question_count);
                prop_assert!(phase == next || phase.can_transition_to(&next));
                if let Some(i) = next.question_index() {
                    prop_assert!(i < question_count);
                }
                phase = next;
            }
        }

        #[test]
        fn index_never_decreases_and_chat_never_reopens(
            question_count in 1usize..8,
            outcomes in prop::collection::vec(outcome_strategy(), 0..20),
        ) {
            let mut phase = ConversationPhase::initial(question_count);
            for outcome in outcomes {
                let next = phase.after(outcome, question_count);
                match (phase, next) {
                    (ConversationPhase::Questioning(i), ConversationPhase::Questioning(j)) => {
                        prop_assert!(j >= i)
                    }
                    (ConversationPhase::Chatting, after) => {
                        prop_assert_eq!(after, ConversationPhase::Chatting)
                    }
                    _ => {}
                }
                phase = next;
            }
        }
    }
}
