//! OpenAI-compatible chat completions client

use async_trait::async_trait;
use reqwest::Client;
use serve_bench_core::{ChatRequest, ChatResponse, ClientError, InferenceClient, TokenUsage};

use crate::config::{ClientConfig, ConfigValidationError};

/// Longest error body kept in a [`ClientError::Status`]
const MAX_ERROR_BODY: usize = 512;

/// Client for servers exposing `/health` and `/v1/chat/completions`
///
/// Cloning is cheap; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: Client,
    config: ClientConfig,
}

impl OpenAiClient {
    /// Create a client with the default configuration
    pub fn new() -> Result<Self, ConfigValidationError> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a client with a custom configuration
    pub fn with_config(config: ClientConfig) -> Result<Self, ConfigValidationError> {
        config.validate()?;

        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ConfigValidationError::Build(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn health_url(base_url: &str) -> String {
        format!("{base_url}/health")
    }

    fn chat_url(base_url: &str) -> String {
        format!("{base_url}/v1/chat/completions")
    }

    /// Map a transport error onto the engine's classification
    fn classify(&self, err: reqwest::Error) -> ClientError {
        if err.is_timeout() {
            ClientError::Timeout(self.config.connect_timeout)
        } else if err.is_connect() {
            ClientError::ConnectionRefused(err.to_string())
        } else if let Some(status) = err.status() {
            ClientError::Status {
                status: status.as_u16(),
                body: String::new(),
            }
        } else if err.is_decode() || err.is_body() {
            ClientError::MalformedResponse(err.to_string())
        } else {
            ClientError::Other(err.to_string())
        }
    }
}

#[async_trait]
impl InferenceClient for OpenAiClient {
    async fn health_check(&self, base_url: &str) -> Result<(), ClientError> {
        self.client
            .get(Self::health_url(base_url))
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| self.classify(e))?;
        Ok(())
    }

    async fn chat_completion(
        &self,
        base_url: &str,
        request: &ChatRequest,
    ) -> Result<TokenUsage, ClientError> {
        let response = self
            .client
            .post(Self::chat_url(base_url))
            .json(request)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| self.classify(e))?;

        if !status.is_success() {
            let text = String::from_utf8_lossy(&body);
            return Err(ClientError::Status {
                status: status.as_u16(),
                body: text.trim().chars().take(MAX_ERROR_BODY).collect(),
            });
        }

        let parsed: ChatResponse = serde_json::from_slice(&body)
            .map_err(|e| ClientError::MalformedResponse(e.to_string()))?;

        Ok(parsed.token_usage())
    }
}
