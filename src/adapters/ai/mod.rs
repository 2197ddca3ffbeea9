//! AI Provider Adapters.
//!
//! Implementations of the AIProvider port.
//!
//! ## Available Adapters
//!
//! - `OpenAIProvider` - OpenAI chat completions, structured outputs, and transcription
//! - `MockAIProvider` - Scripted provider for tests

mod mock_provider;
mod openai_provider;

pub use mock_provider::{
    MockAIProvider, MockCall, MockError, MockResponse, DEFAULT_MOCK_RESPONSE,
    DEFAULT_MOCK_TRANSCRIPT, MOCK_MODEL,
};
pub use openai_provider::{OpenAIConfig, OpenAIProvider};
