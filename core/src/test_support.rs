//! Mock inference client shared by the worker and orchestrator tests

use crate::error::ClientError;
use crate::request::ChatRequest;
use crate::response::TokenUsage;
use crate::traits::InferenceClient;

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

type Script = dyn Fn(&str) -> (Duration, Result<TokenUsage, ClientError>) + Send + Sync;

/// Scripted client: the reply (delay + result) is a function of the prompt
pub(crate) struct MockClient {
    unhealthy_urls: Vec<String>,
    health_delay: Option<Duration>,
    script: Box<Script>,
    pub chat_calls: AtomicUsize,
    pub health_calls: AtomicUsize,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
    pub requests: Mutex<Vec<(String, ChatRequest)>>,
}

impl MockClient {
    pub fn new(
        script: impl Fn(&str) -> (Duration, Result<TokenUsage, ClientError>) + Send + Sync + 'static,
    ) -> Self {
        Self {
            unhealthy_urls: Vec::new(),
            health_delay: None,
            script: Box::new(script),
            chat_calls: AtomicUsize::new(0),
            health_calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Every prompt succeeds after `delay` with the given usage
    pub fn constant(delay: Duration, usage: TokenUsage) -> Self {
        Self::new(move |_| (delay, Ok(usage)))
    }

    pub fn with_unhealthy(mut self, base_url: &str) -> Self {
        self.unhealthy_urls.push(base_url.to_string());
        self
    }

    pub fn with_health_delay(mut self, delay: Duration) -> Self {
        self.health_delay = Some(delay);
        self
    }

    pub fn chat_calls(&self) -> usize {
        self.chat_calls.load(Ordering::SeqCst)
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}

#[async_trait]
impl InferenceClient for MockClient {
    async fn health_check(&self, base_url: &str) -> Result<(), ClientError> {
        self.health_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.health_delay {
            tokio::time::sleep(delay).await;
        }
        if self.unhealthy_urls.iter().any(|u| u == base_url) {
            return Err(ClientError::ConnectionRefused(base_url.to_string()));
        }
        Ok(())
    }

    async fn chat_completion(
        &self,
        base_url: &str,
        request: &ChatRequest,
    ) -> Result<TokenUsage, ClientError> {
        self.chat_calls.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .unwrap()
            .push((base_url.to_string(), request.clone()));

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        let (delay, result) = (self.script)(&request.messages[0].content);
        tokio::time::sleep(delay).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

pub(crate) fn prompts(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("prompt-{i}")).collect()
}
