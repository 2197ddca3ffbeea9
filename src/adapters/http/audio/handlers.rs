//! HTTP handler for audio transcription.

use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::adapters::http::error::ApiError;
use crate::application::handlers::{TranscribeAudioHandler, TranscriptionError};
use crate::ports::AudioInput;

/// Multipart field carrying the recording.
pub const AUDIO_FIELD: &str = "audio";

const DEFAULT_FILE_NAME: &str = "audio.webm";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionResponse {
    pub text: String,
}

#[derive(Clone)]
pub struct AudioHandlers {
    transcribe_handler: Arc<TranscribeAudioHandler>,
}

impl AudioHandlers {
    pub fn new(transcribe_handler: Arc<TranscribeAudioHandler>) -> Self {
        Self { transcribe_handler }
    }
}

/// POST /api/transcribe
///
/// The upload is held in memory for the duration of the request only.
pub async fn transcribe_audio(
    State(handlers): State<AudioHandlers>,
    mut multipart: Multipart,
) -> Result<Json<TranscriptionResponse>, ApiError> {
    let mut audio = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation(AUDIO_FIELD, format!("Malformed upload: {}", e)))?
    {
        if field.name() != Some(AUDIO_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or(DEFAULT_FILE_NAME).to_string();
        let mime_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::validation(AUDIO_FIELD, format!("Malformed upload: {}", e)))?;

        let mut input = AudioInput::new(bytes.to_vec(), file_name);
        if let Some(mime_type) = mime_type {
            input = input.with_mime_type(mime_type);
        }
        audio = Some(input);
        break;
    }

    let audio = audio.ok_or(TranscriptionError::EmptyAudio)?;
    debug!(bytes = audio.bytes.len(), file_name = %audio.file_name, "Transcribing upload");

    let text = handlers.transcribe_handler.handle(audio).await?;
    Ok(Json(TranscriptionResponse { text }))
}
