//! ProcessTurnHandler - one participant utterance, start to finish.
//!
//! Question mode: the utterance is recorded as an answer to the current
//! question, classified, replied to, and may move the participant on. A
//! follow-up (next question or thank-you) is scheduled rather than posted
//! inline.
//!
//! Chat mode: the utterance is replied to with recent transcript as context.
//! State never changes.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::{Addressee, AssistantMessages, ConversationStateService, ParticipantLocks};
use crate::domain::conversation::{
    ChatMessage, ConversationError, ConversationState, DecisionOutcome, FollowUpKind,
    ScheduledMessage, StructuredResponse, Transition,
};
use crate::domain::foundation::{QuestionId, SessionCode, Timestamp, UserId};
use crate::domain::session::{Question, Session};
use crate::ports::{ChatMessageRepository, MessageScheduler, ResponseRepository};

/// Pause before a follow-up message is posted.
pub const DEFAULT_FOLLOW_UP_DELAY: Duration = Duration::from_millis(1500);

/// Command carrying one utterance.
#[derive(Debug, Clone)]
pub struct ProcessTurnCommand {
    pub session_code: SessionCode,
    pub user_id: UserId,
    pub user_name: String,
    pub text: String,
    /// Question the client believes it is answering. Informational only.
    pub question_id: Option<QuestionId>,
}

/// Outcome of a processed turn.
#[derive(Debug, Clone)]
pub struct TurnResult {
    pub assistant_message: ChatMessage,
    pub conversation_state: ConversationState,
    pub transition: Transition,
    /// Classifier verdict; `None` on the chat path.
    pub decision: Option<DecisionOutcome>,
}

/// Handler for conversation turns.
pub struct ProcessTurnHandler {
    responses: Arc<dyn ResponseRepository>,
    messages: Arc<dyn ChatMessageRepository>,
    scheduler: Arc<dyn MessageScheduler>,
    states: ConversationStateService,
    assistant: AssistantMessages,
    locks: ParticipantLocks,
    follow_up_delay: Duration,
}

impl ProcessTurnHandler {
    pub fn new(
        responses: Arc<dyn ResponseRepository>,
        messages: Arc<dyn ChatMessageRepository>,
        scheduler: Arc<dyn MessageScheduler>,
        states: ConversationStateService,
        assistant: AssistantMessages,
        locks: ParticipantLocks,
    ) -> Self {
        Self {
            responses,
            messages,
            scheduler,
            states,
            assistant,
            locks,
            follow_up_delay: DEFAULT_FOLLOW_UP_DELAY,
        }
    }

    pub fn with_follow_up_delay(mut self, delay: Duration) -> Self {
        self.follow_up_delay = delay;
        self
    }

    pub async fn handle(&self, cmd: ProcessTurnCommand) -> Result<TurnResult, ConversationError> {
        let text = cmd.text.trim();
        if text.is_empty() {
            return Err(ConversationError::validation("message", "Message cannot be empty"));
        }
        if cmd.user_name.trim().is_empty() {
            return Err(ConversationError::validation("userName", "User name is required"));
        }

        let session = self.states.load_session(&cmd.session_code).await?;
        let _guard = self.locks.acquire(session.code(), &cmd.user_id).await;

        let state = self.states.load_or_init(&session, &cmd.user_id).await?;
        let to = Addressee::new(&session, &cmd.user_id, &cmd.user_name);

        let current = state
            .phase()
            .question_index()
            .and_then(|i| session.question_at(i));

        match current {
            Some(question) => {
                if let Some(claimed) = cmd.question_id {
                    if claimed != question.id {
                        debug!(
                            session_code = %session.code(),
                            user_id = %cmd.user_id,
                            claimed = %claimed,
                            current = %question.id,
                            "Answer targets a different question; recording against the current one"
                        );
                    }
                }
                self.answer_question(&session, to, question, state, text).await
            }
            None => self.chat(to, state, text).await,
        }
    }

    async fn answer_question(
        &self,
        session: &Session,
        to: Addressee<'_>,
        question: &Question,
        mut state: ConversationState,
        text: &str,
    ) -> Result<TurnResult, ConversationError> {
        self.responses
            .append(&StructuredResponse::new(
                session.code().clone(),
                to.user_id.clone(),
                to.user_name,
                question.id,
                question.text.clone(),
                text,
            ))
            .await?;
        self.messages
            .append(&ChatMessage::from_user(
                session.code().clone(),
                to.user_id.clone(),
                to.user_name,
                text,
            ))
            .await?;

        let transcript = self
            .messages
            .find_by_participant(session.code(), to.user_id)
            .await?;
        let decision = self
            .assistant
            .decide(to, question, session.question_count(), &transcript)
            .await;

        let assistant_message =
            ChatMessage::from_assistant(session.code().clone(), to.user_id.clone(), decision.response);
        self.messages.append(&assistant_message).await?;

        let transition = state.apply_outcome(decision.decision, session);
        if transition != Transition::Stayed {
            self.states.save(&mut state).await?;
        }

        info!(
            session_code = %session.code(),
            user_id = %to.user_id,
            question = question.order + 1,
            decision = decision.decision.as_str(),
            transition = ?transition,
            "Answer processed"
        );

        self.schedule_follow_up(session, to, transition).await;

        Ok(TurnResult {
            assistant_message,
            conversation_state: state,
            transition,
            decision: Some(decision.decision),
        })
    }

    async fn chat(
        &self,
        to: Addressee<'_>,
        state: ConversationState,
        text: &str,
    ) -> Result<TurnResult, ConversationError> {
        self.messages
            .append(&ChatMessage::from_user(
                to.session_code.clone(),
                to.user_id.clone(),
                to.user_name,
                text,
            ))
            .await?;

        let transcript = self
            .messages
            .find_by_participant(to.session_code, to.user_id)
            .await?;
        let reply = self.assistant.chat_reply(to, &transcript).await;

        let assistant_message =
            ChatMessage::from_assistant(to.session_code.clone(), to.user_id.clone(), reply);
        self.messages.append(&assistant_message).await?;

        debug!(
            session_code = %to.session_code,
            user_id = %to.user_id,
            context_len = transcript.len(),
            "Chat message processed"
        );

        Ok(TurnResult {
            assistant_message,
            conversation_state: state,
            transition: Transition::Stayed,
            decision: None,
        })
    }

    async fn schedule_follow_up(&self, session: &Session, to: Addressee<'_>, transition: Transition) {
        let kind = match transition {
            Transition::Stayed => return,
            Transition::Advanced { next_index } => match session.question_at(next_index) {
                Some(next) => FollowUpKind::NextQuestion {
                    question_text: next.text.clone(),
                    position: next_index + 1,
                    total: session.question_count(),
                },
                None => return,
            },
            Transition::Finished => FollowUpKind::Completion,
        };

        let not_before = Timestamp::now().plus_millis(self.follow_up_delay.as_millis() as u64);
        let job = ScheduledMessage::new(
            session.code().clone(),
            session.name(),
            to.user_id.clone(),
            to.user_name,
            kind,
            not_before,
        );

        // The turn itself already succeeded; a lost follow-up only costs pacing.
        if let Err(e) = self.scheduler.schedule(job).await {
            warn!(
                session_code = %session.code(),
                user_id = %to.user_id,
                error = %e,
                "Failed to schedule follow-up message"
            );
        }
    }
}
