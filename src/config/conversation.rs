//! Conversation pacing and persona configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Most conversational AI calls one request makes. Joining posts a welcome
/// and the first question.
pub const AI_CALLS_PER_REQUEST: u32 = 2;

/// Conversation configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ConversationConfig {
    /// Pause before the next question or closing message is posted
    #[serde(default = "default_follow_up_delay")]
    pub follow_up_delay_ms: u64,

    /// How often the follow-up worker checks for due messages
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    /// Name the assistant introduces itself with
    #[serde(default = "default_assistant_name")]
    pub assistant_name: String,

    /// Cap on one conversational AI call before the fallback reply is used
    #[serde(default = "default_ai_deadline")]
    pub ai_deadline_ms: u64,
}

impl ConversationConfig {
    pub fn follow_up_delay(&self) -> Duration {
        Duration::from_millis(self.follow_up_delay_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn ai_deadline(&self) -> Duration {
        Duration::from_millis(self.ai_deadline_ms)
    }

    /// Longest a single request can spend waiting on conversational AI calls.
    pub fn ai_budget_per_request(&self) -> Duration {
        self.ai_deadline() * AI_CALLS_PER_REQUEST
    }

    /// Validate conversation configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.assistant_name.trim().is_empty() {
            return Err(ValidationError::EmptyAssistantName);
        }
        if self.follow_up_delay_ms > 60_000 {
            return Err(ValidationError::FollowUpDelayTooLong);
        }
        if self.poll_interval_ms == 0 || self.poll_interval_ms > 10_000 {
            return Err(ValidationError::InvalidPollInterval);
        }
        if self.ai_deadline_ms == 0 {
            return Err(ValidationError::InvalidAiDeadline);
        }
        Ok(())
    }
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            follow_up_delay_ms: default_follow_up_delay(),
            poll_interval_ms: default_poll_interval(),
            assistant_name: default_assistant_name(),
            ai_deadline_ms: default_ai_deadline(),
        }
    }
}

fn default_follow_up_delay() -> u64 {
    1500
}

fn default_poll_interval() -> u64 {
    250
}

fn default_assistant_name() -> String {
    "Dot".to_string()
}

fn default_ai_deadline() -> u64 {
    20_000
}
