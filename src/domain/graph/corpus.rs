//! Evidence corpus assembled from a session's answers and chat transcripts.

use std::collections::HashMap;

use crate::domain::conversation::{ChatMessage, StructuredResponse};
use crate::domain::foundation::{SessionCode, UserId};

pub const GRAPH_SYSTEM_PROMPT: &str = "Analyze user responses and conversations to create a comprehensive graph network of ideas.

Your task is to:
1. Extract key ideas from user responses and conversations
2. Identify themes that connect multiple ideas
3. Connect users to their contributed ideas
4. Link related ideas and themes with appropriate relationships
5. Provide a summary of main themes, key insights, and potential actions

For each idea node:
- Assign a descriptive label
- Categorize it appropriately
- Rate its importance (1-10)
- Provide details that explain the idea

For each theme node:
- Create a clear label that captures the theme
- Rate its relevance to the overall discussion (1-10)
- Write a summary explaining what this theme encompasses

For user nodes:
- Use the username as the label
- Rate their contribution level to the discussion (1-10)

For edges (connections):
- Create a unique ID
- Identify the source and target nodes
- Describe the relation between nodes
- Rate the strength of the connection (1-10)

In the summary section:
- List 3-5 main themes from the discussion
- Provide 3-7 key insights derived from the analysis
- Suggest 2-4 potential actions based on the feedback";

/// Distinct participants who answered at least one question, in order of
/// their first answer.
pub fn contributors(responses: &[StructuredResponse]) -> Vec<UserId> {
    let mut seen = Vec::new();
    for response in responses {
        if !seen.contains(&response.user_id) {
            seen.push(response.user_id.clone());
        }
    }
    seen
}

/// Formats answers and the participants' own chat lines into one text block.
///
/// Chat lines are labelled with the name the participant used when
/// answering, then the name stored on the message, then the raw user id.
/// Assistant messages are left out.
pub fn build_corpus(responses: &[StructuredResponse], messages: &[ChatMessage]) -> String {
    let mut names: HashMap<&UserId, &str> = HashMap::new();
    for response in responses {
        names
            .entry(&response.user_id)
            .or_insert(response.user_name.as_str());
    }

    let responses_text = responses
        .iter()
        .map(|r| {
            format!(
                "User {}: Question: \"{}\" Response: \"{}\"",
                r.user_name, r.question_text, r.response
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    let chat_text = messages
        .iter()
        .filter(|m| m.is_from_user())
        .map(|m| {
            let name = names
                .get(&m.user_id)
                .copied()
                .or(m.user_name.as_deref())
                .unwrap_or_else(|| m.user_id.as_str());
            format!("User {}: \"{}\"", name, m.message)
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "STRUCTURED RESPONSES:\n{}\n\nCHAT MESSAGES:\n{}",
        responses_text, chat_text
    )
}

pub fn graph_user_prompt(session_code: &SessionCode, corpus: &str) -> String {
    format!(
        "Here are the user responses and chat messages from session {}:\n\n{}\n\n\
         Create a comprehensive graph network of ideas from this data.",
        session_code, corpus
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::QuestionId;

    fn code() -> SessionCode {
        SessionCode::parse("RETRO1").unwrap()
    }

    fn answer(user: &str, name: &str, question: &str, text: &str) -> StructuredResponse {
        StructuredResponse::new(
            code(),
            UserId::new(user).unwrap(),
            name,
            QuestionId::new(),
            question,
            text,
        )
    }

    #[test]
    fn contributors_are_distinct_in_first_answer_order() {
        let responses = vec![
            answer("u2", "Bo", "Q1", "a"),
            answer("u1", "Ana", "Q1", "b"),
            answer("u2", "Bo", "Q2", "c"),
        ];
        let ids: Vec<_> = contributors(&responses)
            .into_iter()
            .map(|u| u.to_string())
            .collect();
        assert_eq!(ids, vec!["u2", "u1"]);
    }

    #[test]
    fn corpus_formats_answers_and_user_chat_only() {
        let responses = vec![
            answer("u1", "Ana", "What went well?", "Shipped on time"),
            answer("u1", "Ana", "What should change?", "Too many meetings"),
        ];
        let messages = vec![
            ChatMessage::from_user(code(), UserId::new("u1").unwrap(), "Ana", "Thanks!"),
            ChatMessage::from_assistant(code(), UserId::new("u1").unwrap(), "You're welcome"),
        ];

        let corpus = build_corpus(&responses, &messages);

        assert_eq!(
            corpus,
            "STRUCTURED RESPONSES:\n\
             User Ana: Question: \"What went well?\" Response: \"Shipped on time\"\n\n\
             User Ana: Question: \"What should change?\" Response: \"Too many meetings\"\n\n\
             CHAT MESSAGES:\n\
             User Ana: \"Thanks!\""
        );
    }

    #[test]
    fn chat_names_prefer_answer_name_then_message_name_then_id() {
        let responses = vec![answer("u1", "Ana", "Q", "A")];
        let mut anonymous =
            ChatMessage::from_user(code(), UserId::new("u3").unwrap(), "ignored", "hey");
        anonymous.user_name = None;
        let messages = vec![
            ChatMessage::from_user(code(), UserId::new("u1").unwrap(), "Ana B.", "one"),
            ChatMessage::from_user(code(), UserId::new("u2").unwrap(), "Bo", "two"),
            anonymous,
        ];

        let corpus = build_corpus(&responses, &messages);

        assert!(corpus.contains("User Ana: \"one\""));
        assert!(corpus.contains("User Bo: \"two\""));
        assert!(corpus.contains("User u3: \"hey\""));
    }

    #[test]
    fn user_prompt_names_session() {
        let prompt = graph_user_prompt(&code(), "CORPUS");
        assert!(prompt.starts_with("Here are the user responses and chat messages from session RETRO1:"));
        assert!(prompt.contains("\n\nCORPUS\n\n"));
    }
}
