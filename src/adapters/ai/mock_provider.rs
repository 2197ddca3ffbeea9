//! Mock AI Provider for testing.
//!
//! Scripted replies for each capability, consumed in order, with error
//! injection, simulated latency, and call tracking.
//!
//! # Example
//!
//! ```ignore
//! let provider = MockAIProvider::new()
//!     .with_response("Welcome aboard!")
//!     .with_structured(json!({ "decision": "advance", ... }))
//!     .with_error(MockError::Unavailable { message: "down".into() });
//! ```

use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{
    AIError, AIProvider, AudioInput, CompletionRequest, CompletionResponse, FinishReason,
    ResponseSchema, TokenUsage,
};

/// Default text returned once the scripted text replies run out.
pub const DEFAULT_MOCK_RESPONSE: &str = "Mock response";

/// Default transcript returned once scripted transcripts run out.
pub const DEFAULT_MOCK_TRANSCRIPT: &str = "Mock transcript";

/// Model name reported on every text reply.
pub const MOCK_MODEL: &str = "mock-model-1";

/// Mock AI provider for testing.
#[derive(Debug, Clone)]
pub struct MockAIProvider {
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    structured: Arc<Mutex<VecDeque<Result<Value, MockError>>>>,
    transcripts: Arc<Mutex<VecDeque<Result<String, MockError>>>>,
    delay: Duration,
    calls: Arc<Mutex<Vec<MockCall>>>,
}

/// A configured text reply.
#[derive(Debug, Clone)]
pub enum MockResponse {
    Success { content: String },
    Error(MockError),
}

/// A recorded call, for verification.
#[derive(Debug, Clone)]
pub enum MockCall {
    Complete(CompletionRequest),
    Structured {
        request: CompletionRequest,
        schema_name: String,
    },
    Transcribe {
        file_name: String,
        byte_len: usize,
    },
}

impl MockCall {
    /// The request's purpose label; `transcribe` for audio calls.
    pub fn purpose(&self) -> &'static str {
        match self {
            MockCall::Complete(request) | MockCall::Structured { request, .. } => {
                request.metadata.purpose
            }
            MockCall::Transcribe { .. } => "transcribe",
        }
    }
}

/// Mock error types for testing error handling.
#[derive(Debug, Clone)]
pub enum MockError {
    RateLimited { retry_after_secs: u32 },
    ContentFiltered { reason: String },
    Unavailable { message: String },
    AuthenticationFailed,
    Network { message: String },
    Parse { message: String },
    Timeout { timeout_secs: u32 },
}

impl From<MockError> for AIError {
    fn from(err: MockError) -> Self {
        match err {
            MockError::RateLimited { retry_after_secs } => AIError::rate_limited(retry_after_secs),
            MockError::ContentFiltered { reason } => AIError::content_filtered(reason),
            MockError::Unavailable { message } => AIError::unavailable(message),
            MockError::AuthenticationFailed => AIError::AuthenticationFailed,
            MockError::Network { message } => AIError::network(message),
            MockError::Parse { message } => AIError::parse(message),
            MockError::Timeout { timeout_secs } => AIError::Timeout { timeout_secs },
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Default for MockAIProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAIProvider {
    /// Creates a new mock provider with default settings.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            structured: Arc::new(Mutex::new(VecDeque::new())),
            transcripts: Arc::new(Mutex::new(VecDeque::new())),
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queues a text reply.
    pub fn with_response(self, content: impl Into<String>) -> Self {
        lock(&self.responses).push_back(MockResponse::Success {
            content: content.into(),
        });
        self
    }

    /// Queues a text error.
    pub fn with_error(self, error: MockError) -> Self {
        lock(&self.responses).push_back(MockResponse::Error(error));
        self
    }

    /// Queues a structured reply.
    pub fn with_structured(self, value: Value) -> Self {
        lock(&self.structured).push_back(Ok(value));
        self
    }

    /// Queues a structured error.
    pub fn with_structured_error(self, error: MockError) -> Self {
        lock(&self.structured).push_back(Err(error));
        self
    }

    /// Queues a transcript.
    pub fn with_transcript(self, text: impl Into<String>) -> Self {
        lock(&self.transcripts).push_back(Ok(text.into()));
        self
    }

    /// Queues a transcription error.
    pub fn with_transcription_error(self, error: MockError) -> Self {
        lock(&self.transcripts).push_back(Err(error));
        self
    }

    /// Sets simulated latency per request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Returns the number of calls made to this provider.
    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// Returns all recorded calls.
    pub fn get_calls(&self) -> Vec<MockCall> {
        lock(&self.calls).clone()
    }

    /// Purpose labels of all recorded calls, in order.
    pub fn purposes(&self) -> Vec<&'static str> {
        lock(&self.calls).iter().map(MockCall::purpose).collect()
    }

    /// Clears the call history.
    pub fn clear_calls(&self) {
        lock(&self.calls).clear();
    }

    async fn simulate_latency(&self) {
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
    }
}

#[async_trait]
impl AIProvider for MockAIProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        lock(&self.calls).push(MockCall::Complete(request));
        self.simulate_latency().await;

        let next = lock(&self.responses).pop_front();
        match next {
            Some(MockResponse::Error(err)) => Err(err.into()),
            Some(MockResponse::Success { content }) => Ok(CompletionResponse {
                content,
                usage: TokenUsage::new(10, 20),
                model: MOCK_MODEL.to_string(),
                finish_reason: FinishReason::Stop,
            }),
            None => Ok(CompletionResponse {
                content: DEFAULT_MOCK_RESPONSE.to_string(),
                usage: TokenUsage::new(5, 10),
                model: MOCK_MODEL.to_string(),
                finish_reason: FinishReason::Stop,
            }),
        }
    }

    async fn complete_structured(
        &self,
        request: CompletionRequest,
        schema: &ResponseSchema,
    ) -> Result<Value, AIError> {
        lock(&self.calls).push(MockCall::Structured {
            request,
            schema_name: schema.name.clone(),
        });
        self.simulate_latency().await;

        let next = lock(&self.structured).pop_front();
        match next {
            Some(result) => result.map_err(AIError::from),
            None => Err(AIError::unavailable("no structured response configured")),
        }
    }

    async fn transcribe(&self, audio: AudioInput) -> Result<String, AIError> {
        lock(&self.calls).push(MockCall::Transcribe {
            file_name: audio.file_name.clone(),
            byte_len: audio.bytes.len(),
        });
        self.simulate_latency().await;

        let next = lock(&self.transcripts).pop_front();
        match next {
            Some(result) => result.map_err(AIError::from),
            None => Ok(DEFAULT_MOCK_TRANSCRIPT.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::SessionCode;
    use crate::ports::{MessageRole, RequestMetadata};
    use serde_json::json;

    fn test_request(purpose: &'static str) -> CompletionRequest {
        CompletionRequest::new(RequestMetadata::new(
            SessionCode::parse("ABC123").unwrap(),
            purpose,
        ))
        .with_message(MessageRole::User, "Hello")
    }

    fn schema() -> ResponseSchema {
        ResponseSchema::new("decision_analysis", json!({ "type": "object" }))
    }

    #[tokio::test]
    async fn returns_text_replies_in_order_then_default() {
        let provider = MockAIProvider::new().with_response("First").with_response("Second");

        let r1 = provider.complete(test_request("a")).await.unwrap();
        let r2 = provider.complete(test_request("b")).await.unwrap();
        let r3 = provider.complete(test_request("c")).await.unwrap();

        assert_eq!(r1.content, "First");
        assert_eq!(r2.content, "Second");
        assert_eq!(r3.content, DEFAULT_MOCK_RESPONSE);
        assert_eq!(r1.model, MOCK_MODEL);
    }

    #[tokio::test]
    async fn returns_configured_text_error() {
        let provider =
            MockAIProvider::new().with_error(MockError::RateLimited { retry_after_secs: 30 });

        let err = provider.complete(test_request("a")).await.unwrap_err();

        assert!(err.is_retryable());
        assert!(matches!(err, AIError::RateLimited { retry_after_secs: 30 }));
    }

    #[tokio::test]
    async fn structured_queue_is_independent_of_text_queue() {
        let provider = MockAIProvider::new()
            .with_response("text")
            .with_structured(json!({ "decision": "advance" }));

        let value = provider
            .complete_structured(test_request("decision"), &schema())
            .await
            .unwrap();
        let text = provider.complete(test_request("chat")).await.unwrap();

        assert_eq!(value["decision"], "advance");
        assert_eq!(text.content, "text");
    }

    #[tokio::test]
    async fn structured_without_script_is_unavailable() {
        let provider = MockAIProvider::new();
        let err = provider
            .complete_structured(test_request("decision"), &schema())
            .await
            .unwrap_err();
        assert!(matches!(err, AIError::Unavailable { .. }));
    }

    #[tokio::test]
    async fn transcribe_returns_script_then_default() {
        let provider = MockAIProvider::new()
            .with_transcript("hello there")
            .with_transcription_error(MockError::AuthenticationFailed);

        let audio = AudioInput::new(vec![1, 2, 3], "clip.webm");
        assert_eq!(provider.transcribe(audio.clone()).await.unwrap(), "hello there");
        assert!(matches!(
            provider.transcribe(audio.clone()).await,
            Err(AIError::AuthenticationFailed)
        ));
        assert_eq!(provider.transcribe(audio).await.unwrap(), DEFAULT_MOCK_TRANSCRIPT);
    }

    #[tokio::test]
    async fn tracks_calls_and_purposes() {
        let provider = MockAIProvider::new();

        provider.complete(test_request("welcome")).await.unwrap();
        let _ = provider
            .complete_structured(test_request("decision"), &schema())
            .await;
        provider
            .transcribe(AudioInput::new(vec![0; 4], "a.webm"))
            .await
            .unwrap();

        assert_eq!(provider.call_count(), 3);
        assert_eq!(provider.purposes(), vec!["welcome", "decision", "transcribe"]);
        assert!(matches!(
            &provider.get_calls()[1],
            MockCall::Structured { schema_name, .. } if schema_name == "decision_analysis"
        ));

        provider.clear_calls();
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn respects_delay() {
        let provider = MockAIProvider::new().with_delay(Duration::from_millis(50));

        let start = std::time::Instant::now();
        provider.complete(test_request("a")).await.unwrap();

        assert!(start.elapsed() >= Duration::from_millis(50));
    }

    #[test]
    fn mock_error_converts_to_ai_error() {
        let err: AIError = MockError::AuthenticationFailed.into();
        assert!(matches!(err, AIError::AuthenticationFailed));

        let err: AIError = MockError::Timeout { timeout_secs: 30 }.into();
        assert!(matches!(err, AIError::Timeout { timeout_secs: 30 }));
    }
}
