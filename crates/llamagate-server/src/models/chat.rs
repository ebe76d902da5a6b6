//! Multi-message completion request/response types.

use serde::{Deserialize, Serialize};

use super::{default_model, default_stream};

/// One turn of a conversation. Relative order in the request is
/// significant for prompt assembly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn assistant(content: String) -> Self {
        Self {
            role: "assistant".to_string(),
            content,
        }
    }
}

/// `POST /api/chat` request.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    #[serde(default = "default_stream")]
    pub stream: bool,
}

/// Mirrors [`super::GenerateResponse`] but nests the text under `message`.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub model: String,
    pub created_at: String,
    pub message: ChatMessage,
    pub done: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_messages_parse_as_empty() {
        let req: ChatRequest = serde_json::from_str(r#"{"model":"default"}"#).unwrap();
        assert!(req.messages.is_empty());
        assert!(req.stream);
    }

    #[test]
    fn messages_preserve_order() {
        let req: ChatRequest = serde_json::from_str(
            r#"{"messages":[{"role":"system","content":"S"},{"role":"user","content":"U"}]}"#,
        )
        .unwrap();
        assert_eq!(req.messages.len(), 2);
        assert_eq!(req.messages[0].role, "system");
        assert_eq!(req.messages[1].content, "U");
    }
}
