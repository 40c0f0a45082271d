use serde::{Deserialize, Serialize};
use std::fmt;

/// Model identifier sent with every request.
pub const MODEL: &str = "deepseek-chat";

/// Instruction placed ahead of the user's prompt.
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    /// Never constructed; requests carry no conversation history.
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

/// Build the payload for a prompt. The prompt is carried verbatim.
pub fn build_request(prompt: &str) -> ChatRequest {
    ChatRequest {
        model: MODEL.to_string(),
        messages: vec![
            ChatMessage {
                role: ChatRole::System,
                content: SYSTEM_PROMPT.to_string(),
            },
            ChatMessage {
                role: ChatRole::User,
                content: prompt.to_string(),
            },
        ],
    }
}

/// The HTTP request exactly as the transport issues it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestPreview {
    pub method: &'static str,
    pub url: String,
    pub headers: Vec<(&'static str, &'static str)>,
    pub body: String,
}

impl RequestPreview {
    pub fn new(url: &str, request: &ChatRequest) -> Self {
        Self {
            method: "POST",
            url: url.to_string(),
            headers: vec![("Content-Type", "application/json")],
            body: serde_json::to_string_pretty(request).unwrap_or_default(),
        }
    }
}

impl fmt::Display for RequestPreview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", self.method, self.url)?;
        for (name, value) in &self.headers {
            writeln!(f, "{}: {}", name, value)?;
        }
        writeln!(f)?;
        write!(f, "{}", self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_system_then_user_message() {
        let request = build_request("What is Rust?");
        assert_eq!(request.model, "deepseek-chat");
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, ChatRole::System);
        assert_eq!(request.messages[0].content, SYSTEM_PROMPT);
        assert_eq!(request.messages[1].role, ChatRole::User);
        assert_eq!(request.messages[1].content, "What is Rust?");
    }

    #[test]
    fn prompt_is_not_trimmed_or_escaped() {
        for prompt in ["", "   ", "  padded\t", "quote \" and \\n", "多字节 🦀\n"] {
            let request = build_request(prompt);
            assert_eq!(request.messages.len(), 2);
            assert_eq!(request.messages[1].role, ChatRole::User);
            assert_eq!(request.messages[1].content, prompt);
        }
    }

    #[test]
    fn serializes_to_wire_shape() {
        let value = serde_json::to_value(build_request("Hello")).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "model": "deepseek-chat",
                "messages": [
                    { "role": "system", "content": SYSTEM_PROMPT },
                    { "role": "user", "content": "Hello" }
                ]
            })
        );
    }

    #[test]
    fn preview_shows_method_url_header_and_body() {
        let request = build_request("Hello");
        let preview = RequestPreview::new("http://localhost:8080/api/chat", &request);
        let text = preview.to_string();

        assert!(text.starts_with("POST http://localhost:8080/api/chat\n"));
        assert!(text.contains("Content-Type: application/json"));

        let body_start = text.find('{').unwrap();
        let body: ChatRequest = serde_json::from_str(&text[body_start..]).unwrap();
        assert_eq!(body, request);
    }
}
