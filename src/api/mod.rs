//! Wire payloads for OpenAI-compatible `chat/completions` endpoints.

use serde::{Deserialize, Serialize};

pub const ROLE_SYSTEM: &str = "system";
pub const ROLE_USER: &str = "user";
pub const ROLE_ASSISTANT: &str = "assistant";

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: &str, content: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            content: content.into(),
        }
    }
}

#[derive(Serialize, Debug)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub stream: bool,
}

#[derive(Deserialize)]
pub struct ChatResponseDelta {
    pub content: Option<String>,
}

#[derive(Deserialize)]
pub struct ChatResponseChoice {
    pub delta: ChatResponseDelta,
}

#[derive(Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatResponseChoice>,
}

/// Build the message list for one completion: system prompt, the previous
/// answer as an assistant turn when following up, then the user's prompt.
pub fn build_messages(system_prompt: &str, prompt: &str, context: Option<&str>) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(3);
    if !system_prompt.trim().is_empty() {
        messages.push(ChatMessage::new(ROLE_SYSTEM, system_prompt));
    }
    if let Some(context) = context {
        messages.push(ChatMessage::new(ROLE_ASSISTANT, context));
    }
    messages.push(ChatMessage::new(ROLE_USER, prompt));
    messages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn follow_up_places_context_before_prompt() {
        let messages = build_messages("be brief", "and then?", Some("Restock the shelf."));
        let roles: Vec<&str> = messages.iter().map(|m| m.role.as_str()).collect();
        assert_eq!(roles, vec![ROLE_SYSTEM, ROLE_ASSISTANT, ROLE_USER]);
        assert_eq!(messages[1].content, "Restock the shelf.");
        assert_eq!(messages[2].content, "and then?");
    }

    #[test]
    fn blank_system_prompt_is_omitted() {
        let messages = build_messages("  ", "hello", None);
        assert_eq!(messages, vec![ChatMessage::new(ROLE_USER, "hello")]);
    }

    #[test]
    fn request_serializes_stream_flag() {
        let request = ChatRequest {
            model: "m".into(),
            messages: vec![ChatMessage::new(ROLE_USER, "hi")],
            stream: true,
        };
        let json = serde_json::to_value(&request).expect("serialize");
        assert_eq!(json["stream"], serde_json::Value::Bool(true));
        assert_eq!(json["messages"][0]["role"], "user");
    }
}
