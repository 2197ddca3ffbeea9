//! HTTP adapter for speech-to-text uploads.

mod handlers;
mod routes;

pub use handlers::{AudioHandlers, TranscriptionResponse, AUDIO_FIELD};
pub use routes::{audio_routes, MAX_AUDIO_BYTES};
