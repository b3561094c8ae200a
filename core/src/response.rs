//! Response payload and per-request outcome types

use crate::error::{ClientError, ErrorKind};
use serde::{Deserialize, Serialize};

/// Token counts reported by a backend for one completion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Tokens in the prompt
    pub prompt_tokens: u64,
    /// Tokens generated
    pub completion_tokens: u64,
}

impl TokenUsage {
    /// Create new token counts
    pub fn new(prompt_tokens: u64, completion_tokens: u64) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
        }
    }

    /// Prompt plus completion tokens
    pub fn total(&self) -> u64 {
        self.prompt_tokens + self.completion_tokens
    }
}

impl std::ops::AddAssign for TokenUsage {
    fn add_assign(&mut self, rhs: Self) {
        self.prompt_tokens += rhs.prompt_tokens;
        self.completion_tokens += rhs.completion_tokens;
    }
}

/// The subset of a chat completion response the benchmark reads
///
/// Everything other than `usage` is ignored; both counters default to zero
/// when absent or null.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatResponse {
    /// Usage block
    #[serde(default)]
    pub usage: Option<UsageBody>,
}

/// `usage` object of a chat completion response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UsageBody {
    /// Number of tokens in the prompt
    #[serde(default)]
    pub prompt_tokens: Option<u64>,
    /// Number of tokens in the completion
    #[serde(default)]
    pub completion_tokens: Option<u64>,
}

impl ChatResponse {
    /// Token usage with missing counters treated as zero
    pub fn token_usage(&self) -> TokenUsage {
        self.usage
            .as_ref()
            .map(|u| {
                TokenUsage::new(
                    u.prompt_tokens.unwrap_or(0),
                    u.completion_tokens.unwrap_or(0),
                )
            })
            .unwrap_or_default()
    }
}

/// Why a request failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestFailure {
    /// Classification
    pub kind: ErrorKind,
    /// Human-readable message
    pub message: String,
}

impl From<ClientError> for RequestFailure {
    fn from(err: ClientError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// Recorded result of sending exactly one prompt to one backend
///
/// Created by a worker, never mutated, consumed once by the driver.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestOutcome {
    /// Wall-clock time from send to full response (or to the failure point)
    pub latency_ms: f64,
    /// Token counts; zero for failures
    pub usage: TokenUsage,
    /// Set when the request failed
    pub error: Option<RequestFailure>,
}

impl RequestOutcome {
    /// A successful request
    pub fn success(latency_ms: f64, usage: TokenUsage) -> Self {
        Self {
            latency_ms,
            usage,
            error: None,
        }
    }

    /// A failed request; failures never carry tokens
    pub fn failure(latency_ms: f64, error: impl Into<RequestFailure>) -> Self {
        Self {
            latency_ms,
            usage: TokenUsage::default(),
            error: Some(error.into()),
        }
    }

    /// Whether the request succeeded
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Error classification, if failed
    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error.as_ref().map(|e| e.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_chat_response_usage() {
        let body = r#"{
            "id": "cmpl-1",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "hi"}}],
            "usage": {"prompt_tokens": 12, "completion_tokens": 34, "total_tokens": 46}
        }"#;
        let response: ChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.token_usage(), TokenUsage::new(12, 34));
    }

    #[test]
    fn test_chat_response_missing_usage_defaults_to_zero() {
        let response: ChatResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert_eq!(response.token_usage(), TokenUsage::default());

        let response: ChatResponse = serde_json::from_str(r#"{"usage": null}"#).unwrap();
        assert_eq!(response.token_usage(), TokenUsage::default());

        let response: ChatResponse =
            serde_json::from_str(r#"{"usage": {"completion_tokens": 7}}"#).unwrap();
        assert_eq!(response.token_usage(), TokenUsage::new(0, 7));
    }

    #[test]
    fn test_failure_outcome_has_no_tokens() {
        let outcome =
            RequestOutcome::failure(60_000.0, ClientError::Timeout(Duration::from_secs(60)));
        assert!(!outcome.is_ok());
        assert_eq!(outcome.usage.total(), 0);
        assert_eq!(outcome.error_kind(), Some(ErrorKind::Timeout));
        assert_eq!(
            outcome.error.unwrap().message,
            "request timed out after 60s"
        );
    }

    #[test]
    fn test_token_usage_add_assign() {
        let mut total = TokenUsage::new(10, 20);
        total += TokenUsage::new(5, 7);
        assert_eq!(total, TokenUsage::new(15, 27));
        assert_eq!(total.total(), 42);
    }
}
