//! HTTP routes for audio transcription.

use axum::{extract::DefaultBodyLimit, routing::post, Router};

use super::handlers::{transcribe_audio, AudioHandlers};

/// Largest accepted upload.
pub const MAX_AUDIO_BYTES: usize = 25 * 1024 * 1024;

pub fn audio_routes(handlers: AudioHandlers) -> Router {
    Router::new()
        .route("/api/transcribe", post(transcribe_audio))
        .layer(DefaultBodyLimit::max(MAX_AUDIO_BYTES))
        .with_state(handlers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::adapters::ai::{MockAIProvider, MockCall, MockError};
    use crate::application::handlers::TranscribeAudioHandler;

    const BOUNDARY: &str = "dotfeedbackboundary";

    fn router(ai: MockAIProvider) -> Router {
        audio_routes(AudioHandlers::new(Arc::new(TranscribeAudioHandler::new(
            Arc::new(ai),
        ))))
    }

    fn upload(field: &str, bytes: &[u8]) -> Request<Body> {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{b}\r\nContent-Disposition: form-data; name=\"{f}\"; filename=\"clip.webm\"\r\nContent-Type: audio/webm\r\n\r\n",
                b = BOUNDARY,
                f = field
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

        Request::post("/api/transcribe")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn transcribes_audio_field() {
        let ai = MockAIProvider::new().with_transcript("  the retro went well  ");
        let response = router(ai.clone())
            .oneshot(upload("audio", b"RIFFfakeaudio"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({ "text": "the retro went well" }));
        match &ai.get_calls()[0] {
            MockCall::Transcribe { file_name, byte_len } => {
                assert_eq!(file_name, "clip.webm");
                assert_eq!(*byte_len, 13);
            }
            other => panic!("unexpected call {:?}", other),
        }
    }

    #[tokio::test]
    async fn missing_audio_field_is_400() {
        let response = router(MockAIProvider::new())
            .oneshot(upload("file", b"data"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn empty_audio_is_400() {
        let response = router(MockAIProvider::new())
            .oneshot(upload("audio", b""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn provider_failure_is_500() {
        let ai = MockAIProvider::new().with_transcription_error(MockError::Timeout { timeout_secs: 60 });
        let response = router(ai).oneshot(upload("audio", b"data")).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["code"], json!("AI_PROVIDER_ERROR"));
    }
}
