//! GenerateGraphHandler - synthesises an idea graph from a session's feedback.
//!
//! The corpus is every structured answer in the session plus the typed chat
//! lines of everyone who answered. Extraction itself is delegated to the AI
//! provider; the result is parsed, normalised, and validated before it is
//! returned. Nothing is persisted.

use std::sync::Arc;

use futures::future::try_join_all;
use tracing::{debug, info, warn};

use crate::domain::foundation::SessionCode;
use crate::domain::graph::{
    build_corpus, contributors, graph_user_prompt, normalize, EdgeKind, GraphError, IdeaGraph,
    GRAPH_SCHEMA_NAME, GRAPH_SYSTEM_PROMPT,
};
use crate::ports::{
    AIProvider, ChatMessageRepository, CompletionRequest, MessageRole, RequestMetadata,
    ResponseRepository, ResponseSchema, SessionRepository,
};

/// A validated graph plus the classification of each of its edges.
#[derive(Debug, Clone)]
pub struct GraphResult {
    pub graph: IdeaGraph,
    /// Parallel to `graph.edges`.
    pub edge_kinds: Vec<EdgeKind>,
}

pub struct GenerateGraphHandler {
    sessions: Arc<dyn SessionRepository>,
    responses: Arc<dyn ResponseRepository>,
    messages: Arc<dyn ChatMessageRepository>,
    ai: Arc<dyn AIProvider>,
}

impl GenerateGraphHandler {
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        responses: Arc<dyn ResponseRepository>,
        messages: Arc<dyn ChatMessageRepository>,
        ai: Arc<dyn AIProvider>,
    ) -> Self {
        Self {
            sessions,
            responses,
            messages,
            ai,
        }
    }

    pub async fn handle(&self, session_code: &SessionCode) -> Result<GraphResult, GraphError> {
        if !self.sessions.exists(session_code).await? {
            return Err(GraphError::SessionNotFound(session_code.clone()));
        }

        let responses = self.responses.find_by_session(session_code).await?;
        if responses.is_empty() {
            return Err(GraphError::NoResponses(session_code.clone()));
        }

        let users = contributors(&responses);
        let transcripts = try_join_all(
            users
                .iter()
                .map(|user| self.messages.find_by_participant(session_code, user)),
        )
        .await?;
        let messages: Vec<_> = transcripts.into_iter().flatten().collect();

        let corpus = build_corpus(&responses, &messages);
        debug!(
            session_code = %session_code,
            responses = responses.len(),
            contributors = users.len(),
            corpus_len = corpus.len(),
            "Requesting idea graph"
        );

        let request = CompletionRequest::new(RequestMetadata::new(session_code.clone(), "graph"))
            .with_system_prompt(GRAPH_SYSTEM_PROMPT)
            .with_message(MessageRole::User, graph_user_prompt(session_code, &corpus));
        let schema = ResponseSchema::new(GRAPH_SCHEMA_NAME, IdeaGraph::schema());

        let value = self
            .ai
            .complete_structured(request, &schema)
            .await
            .map_err(|e| {
                warn!(session_code = %session_code, error = %e, "Graph generation failed");
                GraphError::AIProvider(e.to_string())
            })?;

        let graph: IdeaGraph = serde_json::from_value(value)
            .map_err(|e| GraphError::InvalidGraph(e.to_string()))?;
        let graph = normalize(graph)?;
        let edge_kinds = graph.edge_kinds();

        info!(
            session_code = %session_code,
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            "Idea graph generated"
        );

        Ok(GraphResult { graph, edge_kinds })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockCall, MockError};
    use crate::adapters::storage::InMemoryFeedbackStore;
    use crate::domain::conversation::{ChatMessage, StructuredResponse};
    use crate::domain::foundation::UserId;
    use crate::domain::graph::GraphNode;
    use crate::domain::session::Session;
    use serde_json::json;

    struct Fixture {
        handler: GenerateGraphHandler,
        store: Arc<InMemoryFeedbackStore>,
        ai: MockAIProvider,
        session: Session,
    }

    async fn fixture(ai: MockAIProvider) -> Fixture {
        let store = Arc::new(InMemoryFeedbackStore::new());
        let session = Session::new(
            SessionCode::parse("GRAPH1").unwrap(),
            "Sprint Retro",
            vec!["What went well?".into()],
        )
        .unwrap();
        SessionRepository::insert(&*store, &session).await.unwrap();
        let handler =
            GenerateGraphHandler::new(store.clone(), store.clone(), store.clone(), Arc::new(ai.clone()));
        Fixture {
            handler,
            store,
            ai,
            session,
        }
    }

    async fn answer(f: &Fixture, user: &str, name: &str, text: &str) {
        let uid = UserId::new(user).unwrap();
        let q = &f.session.questions()[0];
        ResponseRepository::append(
            &*f.store,
            &StructuredResponse::new(f.session.code().clone(), uid.clone(), name, q.id, q.text.clone(), text),
        )
        .await
        .unwrap();
        ChatMessageRepository::append(
            &*f.store,
            &ChatMessage::from_user(f.session.code().clone(), uid, name, text),
        )
        .await
        .unwrap();
    }

    fn graph_payload() -> serde_json::Value {
        json!({
            "nodes": [
                { "type": "idea", "id": "i1", "label": "On-time delivery", "category": "process", "importance": 12, "details": "Shipped on time" },
                { "type": "theme", "id": "t1", "label": "Delivery", "relevance": 8, "summary": "Shipping cadence" },
                { "type": "user", "id": "u1", "label": "Ana", "contribution": 7 }
            ],
            "edges": [
                { "id": "", "from": "u1", "to": "i1", "relation": "suggested", "strength": 9 },
                { "id": "e2", "from": "i1", "to": "t1", "relation": "belongs to", "strength": 0 }
            ],
            "summary": {
                "mainThemes": ["Delivery"],
                "keyInsights": ["Team ships reliably"],
                "potentialActions": ["Keep the cadence"]
            }
        })
    }

    #[tokio::test]
    async fn builds_normalised_graph() {
        let f = fixture(MockAIProvider::new().with_structured(graph_payload())).await;
        answer(&f, "u1", "Ana", "Shipped on time").await;

        let result = f.handler.handle(f.session.code()).await.unwrap();

        match result.graph.node("i1").unwrap() {
            GraphNode::Idea { importance, .. } => assert_eq!(*importance, 10.0),
            other => panic!("unexpected node {:?}", other),
        }
        assert_eq!(result.graph.edges[0].id, "edge-u1-i1");
        assert_eq!(result.graph.edges[1].strength, 1.0);
        assert_eq!(
            result.edge_kinds,
            vec![EdgeKind::UserToIdea, EdgeKind::IdeaToTheme]
        );
    }

    #[tokio::test]
    async fn corpus_contains_answers_and_chat() {
        let f = fixture(MockAIProvider::new().with_structured(graph_payload())).await;
        answer(&f, "u1", "Ana", "Shipped on time").await;

        f.handler.handle(f.session.code()).await.unwrap();

        match &f.ai.get_calls()[0] {
            MockCall::Structured { request, schema_name } => {
                assert_eq!(schema_name, GRAPH_SCHEMA_NAME);
                let prompt = &request.messages[0].content;
                assert!(prompt.contains("STRUCTURED RESPONSES:"));
                assert!(prompt.contains("CHAT MESSAGES:"));
                assert!(prompt.contains("Shipped on time"));
            }
            other => panic!("unexpected call {:?}", other),
        }
    }

    #[tokio::test]
    async fn empty_session_is_not_found_and_skips_ai() {
        let f = fixture(MockAIProvider::new()).await;

        let result = f.handler.handle(f.session.code()).await;

        assert!(matches!(result, Err(GraphError::NoResponses(_))));
        assert_eq!(f.ai.call_count(), 0);
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let f = fixture(MockAIProvider::new()).await;
        let result = f.handler.handle(&SessionCode::parse("NOPE22").unwrap()).await;
        assert!(matches!(result, Err(GraphError::SessionNotFound(_))));
    }

    #[tokio::test]
    async fn provider_failure_is_surfaced() {
        let ai = MockAIProvider::new().with_structured_error(MockError::Unavailable {
            message: "overloaded".into(),
        });
        let f = fixture(ai).await;
        answer(&f, "u1", "Ana", "Shipped").await;

        let result = f.handler.handle(f.session.code()).await;
        assert!(matches!(result, Err(GraphError::AIProvider(_))));
    }

    #[tokio::test]
    async fn dangling_edge_is_rejected() {
        let payload = json!({
            "nodes": [{ "type": "user", "id": "u1", "label": "Ana", "contribution": 5 }],
            "edges": [{ "id": "e1", "from": "u1", "to": "ghost", "relation": "x", "strength": 5 }],
            "summary": { "mainThemes": [], "keyInsights": [], "potentialActions": [] }
        });
        let f = fixture(MockAIProvider::new().with_structured(payload)).await;
        answer(&f, "u1", "Ana", "Shipped").await;

        let result = f.handler.handle(f.session.code()).await;
        assert!(matches!(result, Err(GraphError::InvalidGraph(_))));
    }
}
