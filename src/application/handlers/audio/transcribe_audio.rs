//! TranscribeAudioHandler - speech to text for dictated answers.
//!
//! Audio is passed to the provider straight from memory and dropped when
//! the call returns.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::domain::foundation::ErrorCode;
use crate::ports::{AIError, AIProvider, AudioInput};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TranscriptionError {
    #[error("No audio data received")]
    EmptyAudio,

    #[error("Transcription failed: {0}")]
    AIProvider(#[from] AIError),
}

impl TranscriptionError {
    pub fn code(&self) -> ErrorCode {
        match self {
            TranscriptionError::EmptyAudio => ErrorCode::ValidationFailed,
            TranscriptionError::AIProvider(_) => ErrorCode::AIProviderError,
        }
    }
}

pub struct TranscribeAudioHandler {
    ai: Arc<dyn AIProvider>,
}

impl TranscribeAudioHandler {
    pub fn new(ai: Arc<dyn AIProvider>) -> Self {
        Self { ai }
    }

    pub async fn handle(&self, audio: AudioInput) -> Result<String, TranscriptionError> {
        if audio.is_empty() {
            return Err(TranscriptionError::EmptyAudio);
        }

        let byte_len = audio.bytes.len();
        let text = self.ai.transcribe(audio).await.map_err(|e| {
            warn!(error = %e, byte_len, "Transcription failed");
            e
        })?;

        info!(byte_len, text_len = text.len(), "Audio transcribed");
        Ok(text.trim().to_string())
    }
}
