//! Generation of every assistant utterance.
//!
//! Each method asks the AI provider for text and falls back to a fixed
//! reply when the call fails or outlives the deadline, so callers always get
//! something to post.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tracing::{debug, warn};

use crate::domain::conversation::prompts::{
    chat_system_prompt, completion_system_prompt, completion_user_prompt, decision_system_prompt,
    rephrase_system_prompt, rephrase_user_prompt, welcome_fallback, welcome_system_prompt,
    welcome_user_prompt, CHAT_FALLBACK_REPLY, CHAT_MAX_TOKENS, COMPLETION_FALLBACK,
    SHORT_MESSAGE_MAX_TOKENS,
};
use crate::domain::conversation::{
    ChatMessage, TurnDecision, CHAT_CONTEXT_LIMIT, DECISION_SCHEMA_NAME,
};
use crate::domain::foundation::{SessionCode, UserId};
use crate::domain::session::{Question, Session};
use crate::ports::{AIProvider, CompletionRequest, MessageRole, RequestMetadata, ResponseSchema};

/// Default assistant persona name.
pub const DEFAULT_ASSISTANT_NAME: &str = "Dot";

/// Default cap on a single conversational AI call, retries included.
pub const DEFAULT_AI_DEADLINE: Duration = Duration::from_secs(20);

/// Who the participant is, for prompt personalisation.
#[derive(Debug, Clone, Copy)]
pub struct Addressee<'a> {
    pub session_code: &'a SessionCode,
    pub session_name: &'a str,
    pub user_id: &'a UserId,
    pub user_name: &'a str,
}

impl<'a> Addressee<'a> {
    pub fn new(session: &'a Session, user_id: &'a UserId, user_name: &'a str) -> Self {
        Self {
            session_code: session.code(),
            session_name: session.name(),
            user_id,
            user_name,
        }
    }

    fn metadata(&self, purpose: &'static str) -> RequestMetadata {
        RequestMetadata::new(self.session_code.clone(), purpose).for_user(self.user_id.clone())
    }
}

/// Writes the assistant's side of a conversation.
#[derive(Clone)]
pub struct AssistantMessages {
    ai: Arc<dyn AIProvider>,
    assistant_name: String,
    deadline: Duration,
}

impl AssistantMessages {
    pub fn new(ai: Arc<dyn AIProvider>) -> Self {
        Self {
            ai,
            assistant_name: DEFAULT_ASSISTANT_NAME.to_string(),
            deadline: DEFAULT_AI_DEADLINE,
        }
    }

    pub fn with_assistant_name(mut self, name: impl Into<String>) -> Self {
        self.assistant_name = name.into();
        self
    }

    /// Caps how long any one call may take before the fallback is used.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn assistant_name(&self) -> &str {
        &self.assistant_name
    }

    /// Personal greeting for a participant joining for the first time.
    pub async fn welcome(&self, to: Addressee<'_>) -> String {
        let request = CompletionRequest::new(to.metadata("welcome"))
            .with_system_prompt(welcome_system_prompt(&self.assistant_name))
            .with_message(
                MessageRole::User,
                welcome_user_prompt(to.user_name, to.session_name),
            )
            .with_max_tokens(SHORT_MESSAGE_MAX_TOKENS);

        self.generate(request, || {
            welcome_fallback(&self.assistant_name, to.user_name)
        })
        .await
    }

    /// Conversational version of a question. Falls back to the literal text.
    ///
    /// `position` is one-based.
    pub async fn rephrase_question(
        &self,
        to: Addressee<'_>,
        question_text: &str,
        position: usize,
        total: usize,
    ) -> String {
        let request = CompletionRequest::new(to.metadata("rephrase_question"))
            .with_system_prompt(rephrase_system_prompt(&self.assistant_name))
            .with_message(
                MessageRole::User,
                rephrase_user_prompt(question_text, to.user_name, to.session_name, position, total),
            )
            .with_max_tokens(SHORT_MESSAGE_MAX_TOKENS);

        self.generate(request, || question_text.to_string()).await
    }

    /// Thank-you posted after the last question.
    pub async fn completion(&self, to: Addressee<'_>) -> String {
        let request = CompletionRequest::new(to.metadata("completion"))
            .with_system_prompt(completion_system_prompt())
            .with_message(
                MessageRole::User,
                completion_user_prompt(to.user_name, to.session_name),
            )
            .with_max_tokens(SHORT_MESSAGE_MAX_TOKENS);

        self.generate(request, || COMPLETION_FALLBACK.to_string())
            .await
    }

    /// Free-chat reply. Only the most recent messages are sent as context.
    pub async fn chat_reply(&self, to: Addressee<'_>, transcript: &[ChatMessage]) -> String {
        let request = CompletionRequest::new(to.metadata("chat"))
            .with_system_prompt(chat_system_prompt(&self.assistant_name, to.session_name))
            .with_transcript(recent(transcript))
            .with_max_tokens(CHAT_MAX_TOKENS);

        self.generate(request, || CHAT_FALLBACK_REPLY.to_string())
            .await
    }

    /// Classifies the latest answer to `question`.
    ///
    /// `transcript` must already contain the answer. Any provider or parse
    /// failure yields [`TurnDecision::fallback`], which keeps the participant
    /// on the same question.
    pub async fn decide(
        &self,
        to: Addressee<'_>,
        question: &Question,
        total: usize,
        transcript: &[ChatMessage],
    ) -> TurnDecision {
        let request = CompletionRequest::new(to.metadata("decision"))
            .with_system_prompt(decision_system_prompt(
                &self.assistant_name,
                to.session_name,
                to.user_name,
                &question.text,
                question.order + 1,
                total,
            ))
            .with_transcript(recent(transcript));
        let schema = ResponseSchema::new(DECISION_SCHEMA_NAME, TurnDecision::schema());

        debug!(
            session_code = %to.session_code,
            user_id = %to.user_id,
            history_len = request.messages.len(),
            "Requesting turn decision"
        );

        let call = self.ai.complete_structured(request, &schema);
        let value = match timeout(self.deadline, call).await {
            Ok(Ok(value)) => value,
            Ok(Err(e)) => {
                warn!(
                    session_code = %to.session_code,
                    user_id = %to.user_id,
                    error = %e,
                    "Decision call failed, keeping participant on current question"
                );
                return TurnDecision::fallback();
            }
            Err(_) => {
                warn!(
                    session_code = %to.session_code,
                    user_id = %to.user_id,
                    deadline_ms = self.deadline.as_millis() as u64,
                    "Decision call timed out, keeping participant on current question"
                );
                return TurnDecision::fallback();
            }
        };

        match TurnDecision::from_value(value) {
            Ok(decision) => {
                debug!(
                    session_code = %to.session_code,
                    user_id = %to.user_id,
                    decision = decision.decision.as_str(),
                    reasoning = %decision.reasoning,
                    "Turn decision received"
                );
                decision
            }
            Err(e) => {
                warn!(
                    session_code = %to.session_code,
                    user_id = %to.user_id,
                    error = %e,
                    "Decision did not match schema, keeping participant on current question"
                );
                TurnDecision::fallback()
            }
        }
    }

    async fn generate(&self, request: CompletionRequest, fallback: impl FnOnce() -> String) -> String {
        let purpose = request.metadata.purpose;
        let session_code = request.metadata.session_code.clone();

        match timeout(self.deadline, self.ai.complete(request)).await {
            Ok(Ok(response)) if !response.content.trim().is_empty() => {
                debug!(
                    %session_code,
                    purpose,
                    model = %response.model,
                    total_tokens = response.usage.total_tokens,
                    finish_reason = response.finish_reason.as_str(),
                    "AI reply received"
                );
                response.content.trim().to_string()
            }
            Ok(Ok(_)) => {
                warn!(%session_code, purpose, "AI returned empty text, using fallback");
                fallback()
            }
            Ok(Err(e)) => {
                warn!(%session_code, purpose, error = %e, "AI call failed, using fallback");
                fallback()
            }
            Err(_) => {
                warn!(
                    %session_code,
                    purpose,
                    deadline_ms = self.deadline.as_millis() as u64,
                    "AI call timed out, using fallback"
                );
                fallback()
            }
        }
    }
}

fn recent(transcript: &[ChatMessage]) -> &[ChatMessage] {
    let start = transcript.len().saturating_sub(CHAT_CONTEXT_LIMIT);
    &transcript[start..]
}
