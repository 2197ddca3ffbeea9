//! Decision protocol between the turn processor and the classifier.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Reply shown when the classifier fails or returns nothing usable.
pub const DECISION_FALLBACK_REPLY: &str = "I'm sorry, I'm having trouble processing that. \
Could you tell me more about your thoughts on this question?";

const DECISION_FALLBACK_REASONING: &str = "Error in processing user response.";

/// Name under which the decision schema is registered with the provider.
pub const DECISION_SCHEMA_NAME: &str = "decision_analysis";

/// The classifier's verdict on a participant's answer.
///
/// The older `*_conversation` / `*_question(s)` tokens are still accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionOutcome {
    /// Keep probing the current question.
    #[serde(alias = "continue_conversation")]
    Continue,

    /// Current question is answered; move to the next one.
    #[serde(alias = "move_to_next_question")]
    Advance,

    /// Stop asking questions altogether.
    #[serde(alias = "finish_questions")]
    Finish,
}

impl DecisionOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Continue => "continue",
            Self::Advance => "advance",
            Self::Finish => "finish",
        }
    }
}

/// Structured result of classifying one answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnDecision {
    pub decision: DecisionOutcome,

    /// Diagnostic only; never shown to the participant.
    #[serde(default)]
    pub reasoning: String,

    /// The reply to show the participant right now.
    #[serde(default)]
    pub response: String,

    #[serde(default)]
    pub question_complete: bool,
}

impl TurnDecision {
    /// Safe outcome used whenever classification fails.
    pub fn fallback() -> Self {
        Self {
            decision: DecisionOutcome::Continue,
            reasoning: DECISION_FALLBACK_REASONING.to_string(),
            response: DECISION_FALLBACK_REPLY.to_string(),
            question_complete: false,
        }
    }

    /// Parses a provider payload, substituting the fallback reply when the
    /// `response` field is blank.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        let mut decision: TurnDecision = serde_json::from_value(value)?;
        if decision.response.trim().is_empty() {
            decision.response = DECISION_FALLBACK_REPLY.to_string();
        }
        Ok(decision)
    }

    /// JSON schema the provider's structured output must satisfy.
    pub fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "decision": {
                    "type": "string",
                    "enum": ["continue", "advance", "finish"]
                },
                "reasoning": { "type": "string" },
                "response": { "type": "string" },
                "questionComplete": { "type": "boolean" }
            },
            "required": ["decision", "reasoning", "response", "questionComplete"],
            "additionalProperties": false
        })
    }
}
