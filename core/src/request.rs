//! Chat completion request payload

use serde::{Deserialize, Serialize};

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System message (instructions)
    System,
    /// User message (input)
    User,
    /// Assistant message (output)
    Assistant,
}

/// Chat message (OpenAI-compatible format)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Message role
    pub role: Role,
    /// Message text
    pub content: String,
}

impl Message {
    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Parameters shared by every request sent during a run
#[derive(Debug, Clone, PartialEq)]
pub struct RequestParams {
    /// Model identifier
    pub model: String,
    /// `max_tokens` for the completion
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f64,
}

impl From<&crate::config::RunParameters> for RequestParams {
    fn from(params: &crate::config::RunParameters) -> Self {
        Self {
            model: params.model.clone(),
            max_tokens: params.max_output_tokens,
            temperature: params.temperature,
        }
    }
}

/// Body of `POST {url}/v1/chat/completions`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Model identifier
    pub model: String,
    /// Conversation; a single user turn for benchmarking
    pub messages: Vec<Message>,
    /// Completion length cap
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f64,
    /// Always `false`: latency is measured to the full response
    pub stream: bool,
}

impl ChatRequest {
    /// Build a single-turn, non-streaming request for `prompt`
    pub fn for_prompt(params: &RequestParams, prompt: &str) -> Self {
        Self {
            model: params.model.clone(),
            messages: vec![Message::user(prompt)],
            max_tokens: params.max_tokens,
            temperature: params.temperature,
            stream: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_request_wire_format() {
        let params = RequestParams {
            model: "qwen2-7b".into(),
            max_tokens: 128,
            temperature: 0.0,
        };
        let request = ChatRequest::for_prompt(&params, "Hello");
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "model": "qwen2-7b",
                "messages": [{"role": "user", "content": "Hello"}],
                "max_tokens": 128,
                "temperature": 0.0,
                "stream": false,
            })
        );
    }

    #[test]
    fn test_role_lowercase_serialization() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(
            serde_json::to_string(&Role::Assistant).unwrap(),
            "\"assistant\""
        );
    }
}
