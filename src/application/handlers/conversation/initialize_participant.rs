//! InitializeParticipantHandler - first contact between a participant and a session.
//!
//! A new participant gets a welcome message and, when the session has
//! questions, the first question. A participant who already has history
//! gets that history back untouched.

use std::sync::Arc;

use tracing::info;

use super::{Addressee, AssistantMessages, ConversationStateService, ParticipantLocks};
use crate::domain::conversation::{ChatMessage, ConversationError, ConversationState};
use crate::domain::foundation::{SessionCode, UserId};
use crate::ports::ChatMessageRepository;

/// Command to join a participant to a session.
#[derive(Debug, Clone)]
pub struct InitializeParticipantCommand {
    pub session_code: SessionCode,
    pub user_id: UserId,
    pub user_name: String,
}

/// Transcript and state after joining.
#[derive(Debug, Clone)]
pub struct InitializeParticipantResult {
    /// True when the participant already had history and nothing was posted.
    pub is_existing: bool,
    pub messages: Vec<ChatMessage>,
    pub conversation_state: ConversationState,
}

/// Handler for participant initialisation.
pub struct InitializeParticipantHandler {
    messages: Arc<dyn ChatMessageRepository>,
    states: ConversationStateService,
    assistant: AssistantMessages,
    locks: ParticipantLocks,
}

impl InitializeParticipantHandler {
    pub fn new(
        messages: Arc<dyn ChatMessageRepository>,
        states: ConversationStateService,
        assistant: AssistantMessages,
        locks: ParticipantLocks,
    ) -> Self {
        Self {
            messages,
            states,
            assistant,
            locks,
        }
    }

    pub async fn handle(
        &self,
        cmd: InitializeParticipantCommand,
    ) -> Result<InitializeParticipantResult, ConversationError> {
        let session = self.states.load_session(&cmd.session_code).await?;
        let _guard = self.locks.acquire(session.code(), &cmd.user_id).await;

        let existing = self
            .messages
            .find_by_participant(session.code(), &cmd.user_id)
            .await?;
        if !existing.is_empty() {
            let conversation_state = self.states.load_or_init(&session, &cmd.user_id).await?;
            return Ok(InitializeParticipantResult {
                is_existing: true,
                messages: existing,
                conversation_state,
            });
        }

        let to = Addressee::new(&session, &cmd.user_id, &cmd.user_name);

        let welcome = self.assistant.welcome(to).await;
        self.messages
            .append(&ChatMessage::from_assistant(
                session.code().clone(),
                cmd.user_id.clone(),
                welcome,
            ))
            .await?;

        let conversation_state = self.states.load_or_init(&session, &cmd.user_id).await?;

        if let Some(question) = conversation_state
            .phase()
            .question_index()
            .and_then(|i| session.question_at(i))
        {
            let text = self
                .assistant
                .rephrase_question(to, &question.text, question.order + 1, session.question_count())
                .await;
            self.messages
                .append(&ChatMessage::from_assistant(
                    session.code().clone(),
                    cmd.user_id.clone(),
                    text,
                ))
                .await?;
        }

        let messages = self
            .messages
            .find_by_participant(session.code(), &cmd.user_id)
            .await?;

        info!(
            session_code = %session.code(),
            user_id = %cmd.user_id,
            question_mode = conversation_state.question_mode(),
            "Participant initialized"
        );

        Ok(InitializeParticipantResult {
            is_existing: false,
            messages,
            conversation_state,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError};
    use crate::adapters::storage::InMemoryFeedbackStore;
    use crate::domain::conversation::Sender;
    use crate::domain::foundation::Timestamp;
    use crate::domain::session::Session;
    use crate::ports::SessionRepository;

    struct Fixture {
        handler: InitializeParticipantHandler,
        store: Arc<InMemoryFeedbackStore>,
        ai: MockAIProvider,
    }

    async fn fixture(session: &Session, ai: MockAIProvider) -> Fixture {
        let store = Arc::new(InMemoryFeedbackStore::new());
        SessionRepository::insert(&*store, session).await.unwrap();
        let handler = InitializeParticipantHandler::new(
            store.clone(),
            ConversationStateService::new(store.clone(), store.clone()),
            AssistantMessages::new(Arc::new(ai.clone())),
            ParticipantLocks::new(),
        );
        Fixture { handler, store, ai }
    }

    fn retro() -> Session {
        Session::new(
            SessionCode::parse("RETRO1").unwrap(),
            "Sprint Retro",
            vec!["What went well?".into(), "What should change?".into()],
        )
        .unwrap()
    }

    fn command(session: &Session) -> InitializeParticipantCommand {
        InitializeParticipantCommand {
            session_code: session.code().clone(),
            user_id: UserId::new("U1").unwrap(),
            user_name: "Ana".into(),
        }
    }

    #[tokio::test]
    async fn new_participant_gets_welcome_and_first_question() {
        let session = retro();
        let ai = MockAIProvider::new()
            .with_response("Welcome Ana!")
            .with_response("So, what went well?");
        let f = fixture(&session, ai).await;

        let result = f.handler.handle(command(&session)).await.unwrap();

        assert!(!result.is_existing);
        let texts: Vec<_> = result.messages.iter().map(|m| m.message.as_str()).collect();
        assert_eq!(texts, vec!["Welcome Ana!", "So, what went well?"]);
        assert!(result.messages.iter().all(|m| m.sender == Sender::Assistant));
        assert!(result.conversation_state.question_mode());
        assert_eq!(result.conversation_state.current_question_index(), 0);
        assert_eq!(f.ai.purposes(), vec!["welcome", "rephrase_question"]);
    }

    #[tokio::test]
    async fn rejoin_returns_history_unchanged() {
        let session = retro();
        let f = fixture(&session, MockAIProvider::new()).await;

        let first = f.handler.handle(command(&session)).await.unwrap();
        let calls_after_first = f.ai.call_count();
        let second = f.handler.handle(command(&session)).await.unwrap();

        assert!(second.is_existing);
        assert_eq!(second.messages, first.messages);
        assert_eq!(second.conversation_state, first.conversation_state);
        assert_eq!(f.ai.call_count(), calls_after_first);
    }

    #[tokio::test]
    async fn session_without_questions_starts_in_chat() {
        let session = Session::reconstitute(
            SessionCode::parse("CHAT01").unwrap(),
            "Open floor".into(),
            vec![],
            Timestamp::now(),
        );
        let f = fixture(&session, MockAIProvider::new().with_response("Hi!")).await;

        let result = f.handler.handle(command(&session)).await.unwrap();

        assert_eq!(result.messages.len(), 1);
        assert!(!result.conversation_state.question_mode());
    }

    #[tokio::test]
    async fn ai_failure_still_posts_fallbacks() {
        let session = retro();
        let down = || MockError::Unavailable {
            message: "down".into(),
        };
        let ai = MockAIProvider::new().with_error(down()).with_error(down());
        let f = fixture(&session, ai).await;

        let result = f.handler.handle(command(&session)).await.unwrap();

        assert_eq!(result.messages.len(), 2);
        assert!(result.messages[0].message.contains("Ana"));
        assert_eq!(result.messages[1].message, "What went well?");
        assert_eq!(f.store.state_count().await, 1);
    }

    #[tokio::test]
    async fn unknown_session_is_rejected() {
        let session = retro();
        let f = fixture(&session, MockAIProvider::new()).await;
        let mut cmd = command(&session);
        cmd.session_code = SessionCode::parse("OTHER1").unwrap();

        let result = f.handler.handle(cmd).await;
        assert!(matches!(result, Err(ConversationError::SessionNotFound(_))));
        assert_eq!(f.ai.call_count(), 0);
    }
}
