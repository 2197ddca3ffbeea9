//! Top-level HTTP router.
//!
//! Wires every application handler to its adapter-level route group and
//! applies the cross-cutting tower layers (tracing, timeout, CORS).

use std::sync::Arc;
use std::time::Duration;

use axum::{http::HeaderValue, routing::get, Json, Router};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::warn;

use crate::application::handlers::{
    AssistantMessages, ConversationStateService, CreateSessionHandler, GenerateGraphHandler,
    GetChatHistoryHandler, GetSessionHandler, InitializeParticipantHandler, ListSessionsHandler,
    ParticipantLocks, ProcessTurnHandler, TranscribeAudioHandler, DEFAULT_AI_DEADLINE,
    DEFAULT_ASSISTANT_NAME, DEFAULT_FOLLOW_UP_DELAY,
};
use crate::config::ServerConfig;
use crate::ports::{
    AIProvider, ChatMessageRepository, ConversationStateRepository, MessageScheduler,
    ResponseRepository, SessionRepository,
};

use super::audio::{audio_routes, AudioHandlers};
use super::conversation::{conversation_routes, ConversationHandlers};
use super::graph::{graph_routes, GraphHandlers};
use super::session::{session_routes, SessionHandlers};

// ════════════════════════════════════════════════════════════════════════════
// Dependencies
// ════════════════════════════════════════════════════════════════════════════

/// Adapters the application is assembled from.
#[derive(Clone)]
pub struct AppDependencies {
    pub sessions: Arc<dyn SessionRepository>,
    pub responses: Arc<dyn ResponseRepository>,
    pub messages: Arc<dyn ChatMessageRepository>,
    pub states: Arc<dyn ConversationStateRepository>,
    pub scheduler: Arc<dyn MessageScheduler>,
    pub ai: Arc<dyn AIProvider>,
    pub assistant_name: String,
    pub follow_up_delay: Duration,
    pub ai_deadline: Duration,
}

impl AppDependencies {
    /// Uses one store for all four repositories.
    pub fn from_store<S>(
        store: Arc<S>,
        scheduler: Arc<dyn MessageScheduler>,
        ai: Arc<dyn AIProvider>,
    ) -> Self
    where
        S: SessionRepository
            + ResponseRepository
            + ChatMessageRepository
            + ConversationStateRepository
            + 'static,
    {
        Self {
            sessions: store.clone(),
            responses: store.clone(),
            messages: store.clone(),
            states: store,
            scheduler,
            ai,
            assistant_name: DEFAULT_ASSISTANT_NAME.to_string(),
            follow_up_delay: DEFAULT_FOLLOW_UP_DELAY,
            ai_deadline: DEFAULT_AI_DEADLINE,
        }
    }

    pub fn with_assistant_name(mut self, name: impl Into<String>) -> Self {
        self.assistant_name = name.into();
        self
    }

    pub fn with_follow_up_delay(mut self, delay: Duration) -> Self {
        self.follow_up_delay = delay;
        self
    }

    pub fn with_ai_deadline(mut self, deadline: Duration) -> Self {
        self.ai_deadline = deadline;
        self
    }

    /// Assistant message composer shared by request handlers and the follow-up worker.
    pub fn assistant(&self) -> AssistantMessages {
        AssistantMessages::new(self.ai.clone())
            .with_assistant_name(self.assistant_name.clone())
            .with_deadline(self.ai_deadline)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Application state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionHandlers,
    pub conversation: ConversationHandlers,
    pub graph: GraphHandlers,
    pub audio: AudioHandlers,
}

impl AppState {
    pub fn new(deps: &AppDependencies) -> Self {
        let assistant = deps.assistant();
        let locks = ParticipantLocks::new();
        let states = ConversationStateService::new(deps.sessions.clone(), deps.states.clone());

        let sessions = SessionHandlers::new(
            Arc::new(CreateSessionHandler::new(deps.sessions.clone())),
            Arc::new(GetSessionHandler::new(deps.sessions.clone())),
            Arc::new(ListSessionsHandler::new(deps.sessions.clone())),
        );

        let conversation = ConversationHandlers::new(
            Arc::new(InitializeParticipantHandler::new(
                deps.messages.clone(),
                states.clone(),
                assistant.clone(),
                locks.clone(),
            )),
            Arc::new(
                ProcessTurnHandler::new(
                    deps.responses.clone(),
                    deps.messages.clone(),
                    deps.scheduler.clone(),
                    states.clone(),
                    assistant,
                    locks,
                )
                .with_follow_up_delay(deps.follow_up_delay),
            ),
            Arc::new(GetChatHistoryHandler::new(deps.messages.clone(), states.clone())),
            states,
        );

        let graph = GraphHandlers::new(Arc::new(GenerateGraphHandler::new(
            deps.sessions.clone(),
            deps.responses.clone(),
            deps.messages.clone(),
            deps.ai.clone(),
        )));

        let audio = AudioHandlers::new(Arc::new(TranscribeAudioHandler::new(deps.ai.clone())));

        Self {
            sessions,
            conversation,
            graph,
            audio,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Router
// ════════════════════════════════════════════════════════════════════════════

/// GET /health
async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        return base.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(origin = %origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    base.allow_origin(AllowOrigin::list(allowed))
}

/// Builds the full API router.
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    let middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(config.request_timeout()))
        .layer(cors_layer(&config.cors_origins_list()));

    Router::new()
        .route("/health", get(health))
        .merge(session_routes(state.sessions))
        .merge(conversation_routes(state.conversation))
        .merge(graph_routes(state.graph))
        .merge(audio_routes(state.audio))
        .layer(middleware)
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::adapters::ai::MockAIProvider;
    use crate::adapters::scheduler::InMemoryMessageQueue;
    use crate::adapters::storage::InMemoryFeedbackStore;
    use crate::domain::conversation::DECISION_FALLBACK_REPLY;

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn app(config: &ServerConfig) -> Router {
        let deps = AppDependencies::from_store(
            Arc::new(InMemoryFeedbackStore::new()),
            Arc::new(InMemoryMessageQueue::new()),
            Arc::new(MockAIProvider::new()),
        );
        build_router(AppState::new(&deps), config)
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let response = app(&ServerConfig::default())
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn every_route_group_is_mounted() {
        let router = app(&ServerConfig::default());
        let list = router
            .clone()
            .oneshot(Request::get("/api/sessions").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(list.status(), StatusCode::OK);

        let state = router
            .oneshot(
                Request::get("/api/conversation-state/ABC123/u1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(state.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn cors_allows_any_origin_by_default() {
        let response = app(&ServerConfig::default())
            .oneshot(
                Request::get("/health")
                    .header("origin", "http://localhost:5173")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "*"
        );
    }

    #[tokio::test]
    async fn cors_restricts_to_configured_origins() {
        let config = ServerConfig {
            cors_origins: Some("https://feedback.example.com".to_string()),
            ..ServerConfig::default()
        };
        let router = app(&config);

        let allowed = router
            .clone()
            .oneshot(
                Request::get("/health")
                    .header("origin", "https://feedback.example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            allowed.headers().get("access-control-allow-origin").unwrap(),
            "https://feedback.example.com"
        );

        let denied = router
            .oneshot(
                Request::get("/health")
                    .header("origin", "https://elsewhere.example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(denied.headers().get("access-control-allow-origin").is_none());
    }

    #[tokio::test]
    async fn slow_provider_still_gets_a_reply_before_the_request_times_out() {
        let config = ServerConfig {
            request_timeout_secs: 1,
            ..ServerConfig::default()
        };
        let ai = MockAIProvider::new().with_delay(Duration::from_millis(1500));
        let deps = AppDependencies::from_store(
            Arc::new(InMemoryFeedbackStore::new()),
            Arc::new(InMemoryMessageQueue::new()),
            Arc::new(ai),
        )
        .with_ai_deadline(Duration::from_millis(100));
        let router = build_router(AppState::new(&deps), &config);

        let created = router
            .clone()
            .oneshot(post_json(
                "/api/sessions",
                json!({ "name": "Sprint Retro", "questions": ["What went well?"] }),
            ))
            .await
            .unwrap();
        assert_eq!(created.status(), StatusCode::CREATED);
        let code = body_json(created).await["id"].as_str().unwrap().to_string();

        let joined = router
            .clone()
            .oneshot(post_json(
                &format!("/api/sessions/{}/initialize", code),
                json!({ "userId": "u1", "userName": "Ada" }),
            ))
            .await
            .unwrap();
        assert_eq!(joined.status(), StatusCode::OK);

        let turn = router
            .clone()
            .oneshot(post_json(
                "/api/responses",
                json!({
                    "sessionId": code,
                    "userId": "u1",
                    "userName": "Ada",
                    "response": "Shipped"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(turn.status(), StatusCode::CREATED);
        let turn = body_json(turn).await;
        assert_eq!(turn["message"]["message"], json!(DECISION_FALLBACK_REPLY));
        assert_eq!(turn["decision"], json!("continue"));

        let history = router
            .oneshot(
                Request::get(format!("/api/chat/{}/u1", code))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let history = body_json(history).await;
        let senders: Vec<_> = history
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["sender"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(senders, vec!["assistant", "assistant", "user", "assistant"]);
        assert_eq!(
            history.as_array().unwrap().last().unwrap()["message"],
            json!(DECISION_FALLBACK_REPLY)
        );
    }
}
