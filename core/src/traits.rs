//! Core traits for the request transport and progress reporting
//!
//! These traits are defined in core so the engine never depends on a concrete
//! HTTP stack. Implementations live in their respective crates (vendors/, the
//! CLI binary).

use crate::config::Backend;
use crate::error::ClientError;
use crate::request::ChatRequest;
use crate::response::{RequestOutcome, TokenUsage};
use crate::summary::BackendResult;
use async_trait::async_trait;

// ============================================================================
// Inference Client Trait
// ============================================================================

/// Request-sending primitive used by the driver and its workers
///
/// One client is shared (via `Arc`) by every worker of every backend, so
/// implementations should pool connections. `base_url` is already normalized
/// (no trailing `/`).
#[async_trait]
pub trait InferenceClient: Send + Sync {
    /// Liveness probe: `GET {base_url}/health`
    ///
    /// Any non-error response counts as healthy.
    async fn health_check(&self, base_url: &str) -> Result<(), ClientError>;

    /// `POST {base_url}/v1/chat/completions` and read the full response
    async fn chat_completion(
        &self,
        base_url: &str,
        request: &ChatRequest,
    ) -> Result<TokenUsage, ClientError>;
}

// ============================================================================
// Progress Sink
// ============================================================================

/// Observer for run progress
///
/// All methods default to no-ops. `request_completed` is called from the
/// driver's collection loop, never from worker tasks, in completion order.
pub trait ProgressSink: Send + Sync {
    /// A backend benchmark is about to start
    fn backend_started(&self, _backend: &Backend, _total_requests: usize) {}

    /// One request finished (successfully or not)
    fn request_completed(&self, _backend: &Backend, _outcome: &RequestOutcome) {}

    /// A backend benchmark finished
    fn backend_finished(&self, _backend: &Backend, _result: &BackendResult) {}
}

/// Progress sink that ignores every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {}
