//! Audio handlers.

mod transcribe_audio;

pub use transcribe_audio::{TranscribeAudioHandler, TranscriptionError};
