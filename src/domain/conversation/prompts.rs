//! Prompt builders and deterministic fallbacks for every assistant utterance.
//!
//! Each generated message has a fallback used verbatim when the provider
//! call fails, so a participant always gets a reply.

/// Token cap for short generated messages (welcome, rephrase, completion).
pub const SHORT_MESSAGE_MAX_TOKENS: u32 = 150;

/// Token cap for free-chat replies.
pub const CHAT_MAX_TOKENS: u32 = 300;

/// Reply used when a free-chat completion fails.
pub const CHAT_FALLBACK_REPLY: &str =
    "I'm having trouble processing that right now. Could you try again?";

/// Closing message used when the completion message cannot be generated.
pub const COMPLETION_FALLBACK: &str = "Thank you for answering all the questions! \
Your feedback is really valuable. Feel free to keep chatting if anything else comes to mind.";

fn persona(assistant_name: &str) -> String {
    format!(
        "You are {}, an AI assistant designed to engage users in productive conversations and gather feedback.",
        assistant_name
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Welcome
// ─────────────────────────────────────────────────────────────────────────────

pub fn welcome_system_prompt(assistant_name: &str) -> String {
    format!(
        "{}\n\n\
         Generate a warm, friendly welcome message for a new user in a feedback session.\n\
         Your response should:\n\
         1. Welcome the user by name\n\
         2. Briefly introduce yourself as {}\n\
         3. Explain that you'll be asking some questions to gather feedback\n\
         4. Be concise (2-3 sentences)\n\
         5. Include an emoji to add a friendly touch",
        persona(assistant_name),
        assistant_name
    )
}

pub fn welcome_user_prompt(user_name: &str, session_name: &str) -> String {
    format!(
        "Create a welcome message for user \"{}\" who is joining a session called \"{}\".",
        user_name, session_name
    )
}

pub fn welcome_fallback(assistant_name: &str, user_name: &str) -> String {
    format!(
        "Hello {}! 👋 I'm {}, your AI assistant for this session. \
         I'll be asking you a few questions to gather your feedback.",
        user_name, assistant_name
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Question rephrasing
// ─────────────────────────────────────────────────────────────────────────────

pub fn rephrase_system_prompt(assistant_name: &str) -> String {
    format!(
        "{}\n\n\
         Your task is to rephrase a question from the session administrator to make it more conversational and engaging.\n\
         Your response should:\n\
         1. Maintain the core meaning of the original question\n\
         2. Be conversational in tone\n\
         3. Be friendly and approachable\n\
         4. Be concise (1-2 sentences)\n\
         5. Not include any numbering or \"Question X:\" prefixes - just ask the question naturally",
        persona(assistant_name)
    )
}

/// `position` is one-based.
pub fn rephrase_user_prompt(
    question_text: &str,
    user_name: &str,
    session_name: &str,
    position: usize,
    total: usize,
) -> String {
    format!(
        "Rephrase this question: \"{}\"\n\n\
         Context:\n\
         - User's name: {}\n\
         - Session name: {}\n\
         - This is question {} of {}",
        question_text, user_name, session_name, position, total
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Decision
// ─────────────────────────────────────────────────────────────────────────────

pub fn decision_system_prompt(
    assistant_name: &str,
    session_name: &str,
    user_name: &str,
    question_text: &str,
    position: usize,
    total: usize,
) -> String {
    format!(
        "{}\n\n\
         You are currently asking the user a series of questions in a feedback session.\n\n\
         Current session: \"{}\"\n\
         Current user: {}\n\
         Current question ({} of {}): \"{}\"\n\n\
         Based on the user's response to the current question, determine:\n\
         1. Whether the user has sufficiently answered the current question\n\
         2. Whether to continue the conversation about this question (continue), \
         move to the next one (advance), or stop asking questions (finish)\n\
         3. What your response should be\n\n\
         Consider:\n\
         - Has the user provided a substantive answer to the current question?\n\
         - Would follow-up questions get more valuable insights?\n\
         - Has the conversation about this question reached a natural conclusion?",
        persona(assistant_name),
        session_name,
        user_name,
        position,
        total,
        question_text
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Free chat
// ─────────────────────────────────────────────────────────────────────────────

pub fn chat_system_prompt(assistant_name: &str, session_name: &str) -> String {
    format!(
        "{}\n\n\
         Session name: \"{}\"\n\n\
         Your personality:\n\
         - Friendly and approachable\n\
         - Focused on understanding the user's thoughts\n\
         - Empathetic and thoughtful\n\
         - Concise in your responses (typically 1-3 sentences)\n\n\
         Your goal is to have a natural, flowing conversation while gathering high-quality feedback.\n\
         Ask follow-up questions when appropriate to dig deeper into the user's thoughts.",
        persona(assistant_name),
        session_name
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Completion
// ─────────────────────────────────────────────────────────────────────────────

pub fn completion_system_prompt() -> &'static str {
    "Create a message thanking the user for completing all the questions and inviting them \
     to continue chatting freely. Keep it friendly, brief (2-3 sentences), and encouraging."
}

pub fn completion_user_prompt(user_name: &str, session_name: &str) -> String {
    format!(
        "The user \"{}\" just finished every question in the session \"{}\".",
        user_name, session_name
    )
}
