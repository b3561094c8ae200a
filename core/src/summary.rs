//! Per-backend results and the run-level summary document
//!
//! The JSON shape is flat and shared by run output and aggregation input:
//!
//! ```json
//! {
//!   "model": "...", "num_prompts": 100, "concurrency": 8,
//!   "max_output_tokens": 128, "temperature": 0.0,
//!   "results": [
//!     {"backend": "a", "url": "http://a", "ok": true, "duration_s": 1.5, ...},
//!     {"backend": "b", "ok": false, "error": "Health check failed at http://b/health"}
//!   ]
//! }
//! ```

use crate::config::RunParameters;
use serde::{Deserialize, Serialize};

/// Statistics for a backend that passed its health probe
#[derive(Debug, Clone, PartialEq)]
pub struct BackendMetrics {
    /// Backend name
    pub backend: String,
    /// Normalized base URL
    pub url: String,
    /// Wall-clock span of the batch in seconds
    pub duration_s: f64,
    /// Prompts dispatched
    pub total_requests: u64,
    /// Successful requests
    pub successful_requests: u64,
    /// Failed requests
    pub failed_requests: u64,
    /// Prompt tokens over successful requests
    pub prompt_tokens: u64,
    /// Completion tokens over successful requests
    pub completion_tokens: u64,
    /// Completion tokens per second
    pub output_throughput_tps: f64,
    /// Prompt plus completion tokens per second
    pub total_throughput_tps: f64,
    /// Successful requests per second
    pub request_throughput_rps: f64,
    /// Mean latency over all requests (ms)
    pub mean_latency_ms: f64,
    /// Median latency over all requests (ms)
    pub p50_latency_ms: f64,
    /// 99th percentile latency over all requests (ms)
    pub p99_latency_ms: f64,
}

/// Outcome of benchmarking one backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BackendResultRecord", into = "BackendResultRecord")]
pub enum BackendResult {
    /// Health probe passed and the batch ran
    Healthy(BackendMetrics),
    /// Health probe failed; no prompts were dispatched
    Unhealthy {
        /// Backend name
        backend: String,
        /// What went wrong
        error: String,
    },
}

impl BackendResult {
    /// Degraded result for a backend that failed its probe
    pub fn unhealthy(backend: impl Into<String>, error: impl Into<String>) -> Self {
        BackendResult::Unhealthy {
            backend: backend.into(),
            error: error.into(),
        }
    }

    /// Backend name
    pub fn backend(&self) -> &str {
        match self {
            BackendResult::Healthy(m) => &m.backend,
            BackendResult::Unhealthy { backend, .. } => backend,
        }
    }

    /// `true` for [`BackendResult::Healthy`]
    pub fn is_ok(&self) -> bool {
        matches!(self, BackendResult::Healthy(_))
    }

    /// Metrics, if healthy
    pub fn metrics(&self) -> Option<&BackendMetrics> {
        match self {
            BackendResult::Healthy(m) => Some(m),
            BackendResult::Unhealthy { .. } => None,
        }
    }

    /// Error message, if unhealthy
    pub fn error(&self) -> Option<&str> {
        match self {
            BackendResult::Healthy(_) => None,
            BackendResult::Unhealthy { error, .. } => Some(error),
        }
    }
}

/// Run-level envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Run parameters
    #[serde(flatten)]
    pub params: RunParameters,
    /// Results in benchmark (or input file) order
    pub results: Vec<BackendResult>,
}

impl Summary {
    /// Create an empty summary
    pub fn new(params: RunParameters) -> Self {
        Self {
            params,
            results: Vec::new(),
        }
    }

    /// `true` when every backend is healthy
    pub fn all_ok(&self) -> bool {
        self.results.iter().all(BackendResult::is_ok)
    }

    /// Unhealthy results in order
    pub fn failures(&self) -> impl Iterator<Item = &BackendResult> {
        self.results.iter().filter(|r| !r.is_ok())
    }
}

/// The part of a stored summary that aggregation consumes
///
/// Run parameters in the file are ignored; the aggregator supplies its own.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResultsDocument {
    /// Stored results
    pub results: Vec<BackendResult>,
}

impl From<Summary> for ResultsDocument {
    fn from(summary: Summary) -> Self {
        Self {
            results: summary.results,
        }
    }
}

// ============================================================================
// Wire representation
// ============================================================================

/// Flat JSON form of a [`BackendResult`], discriminated by `ok`
#[derive(Debug, Clone, Serialize, Deserialize)]
struct BackendResultRecord {
    backend: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    url: Option<String>,
    ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    duration_s: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    total_requests: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    successful_requests: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    failed_requests: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    prompt_tokens: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    completion_tokens: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    output_throughput_tps: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    total_throughput_tps: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    request_throughput_rps: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    mean_latency_ms: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    p50_latency_ms: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    p99_latency_ms: Option<f64>,
}

impl From<BackendResult> for BackendResultRecord {
    fn from(result: BackendResult) -> Self {
        match result {
            BackendResult::Healthy(m) => Self {
                backend: m.backend,
                url: Some(m.url),
                ok: true,
                error: None,
                duration_s: Some(m.duration_s),
                total_requests: Some(m.total_requests),
                successful_requests: Some(m.successful_requests),
                failed_requests: Some(m.failed_requests),
                prompt_tokens: Some(m.prompt_tokens),
                completion_tokens: Some(m.completion_tokens),
                output_throughput_tps: Some(m.output_throughput_tps),
                total_throughput_tps: Some(m.total_throughput_tps),
                request_throughput_rps: Some(m.request_throughput_rps),
                mean_latency_ms: Some(m.mean_latency_ms),
                p50_latency_ms: Some(m.p50_latency_ms),
                p99_latency_ms: Some(m.p99_latency_ms),
            },
            BackendResult::Unhealthy { backend, error } => Self {
                backend,
                url: None,
                ok: false,
                error: Some(error),
                duration_s: None,
                total_requests: None,
                successful_requests: None,
                failed_requests: None,
                prompt_tokens: None,
                completion_tokens: None,
                output_throughput_tps: None,
                total_throughput_tps: None,
                request_throughput_rps: None,
                mean_latency_ms: None,
                p50_latency_ms: None,
                p99_latency_ms: None,
            },
        }
    }
}

fn required<T>(value: Option<T>, field: &str, backend: &str) -> Result<T, String> {
    value.ok_or_else(|| format!("result for backend '{backend}' is missing field `{field}`"))
}

impl TryFrom<BackendResultRecord> for BackendResult {
    type Error = String;

    fn try_from(r: BackendResultRecord) -> Result<Self, Self::Error> {
        if !r.ok {
            return Ok(BackendResult::Unhealthy {
                error: r.error.unwrap_or_else(|| "unknown".to_string()),
                backend: r.backend,
            });
        }

        let b = r.backend.as_str();
        let metrics = BackendMetrics {
            url: required(r.url, "url", b)?,
            duration_s: required(r.duration_s, "duration_s", b)?,
            total_requests: required(r.total_requests, "total_requests", b)?,
            successful_requests: required(r.successful_requests, "successful_requests", b)?,
            failed_requests: required(r.failed_requests, "failed_requests", b)?,
            prompt_tokens: required(r.prompt_tokens, "prompt_tokens", b)?,
            completion_tokens: required(r.completion_tokens, "completion_tokens", b)?,
            output_throughput_tps: required(r.output_throughput_tps, "output_throughput_tps", b)?,
            total_throughput_tps: required(r.total_throughput_tps, "total_throughput_tps", b)?,
            request_throughput_rps: required(
                r.request_throughput_rps,
                "request_throughput_rps",
                b,
            )?,
            mean_latency_ms: required(r.mean_latency_ms, "mean_latency_ms", b)?,
            p50_latency_ms: required(r.p50_latency_ms, "p50_latency_ms", b)?,
            p99_latency_ms: required(r.p99_latency_ms, "p99_latency_ms", b)?,
            backend: r.backend,
        };

        if metrics.successful_requests + metrics.failed_requests != metrics.total_requests {
            return Err(format!(
                "result for backend '{}' has successful_requests + failed_requests != total_requests",
                metrics.backend
            ));
        }

        Ok(BackendResult::Healthy(metrics))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn healthy(name: &str) -> BackendResult {
        BackendResult::Healthy(BackendMetrics {
            backend: name.to_string(),
            url: format!("http://{name}:8000"),
            duration_s: 12.34,
            total_requests: 100,
            successful_requests: 98,
            failed_requests: 2,
            prompt_tokens: 10_000,
            completion_tokens: 12_800,
            output_throughput_tps: 1037.28,
            total_throughput_tps: 1847.65,
            request_throughput_rps: 7.94,
            mean_latency_ms: 950.5,
            p50_latency_ms: 901.25,
            p99_latency_ms: 2100.0,
        })
    }

    #[test]
    fn test_healthy_wire_format() {
        let value = serde_json::to_value(healthy("vllm")).unwrap();
        let keys: Vec<&str> = value
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();

        assert_eq!(value["ok"], true);
        assert_eq!(value["url"], "http://vllm:8000");
        assert!(!keys.contains(&"error"));
        assert_eq!(keys.len(), 15);
    }

    #[test]
    fn test_unhealthy_wire_format() {
        let result = BackendResult::unhealthy("tgi", "Health check failed at http://tgi/health");
        let value = serde_json::to_value(&result).unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "backend": "tgi",
                "ok": false,
                "error": "Health check failed at http://tgi/health",
            })
        );
    }

    #[test]
    fn test_summary_roundtrip_preserves_order() {
        let summary = Summary {
            params: RunParameters {
                model: "m".into(),
                num_prompts: 100,
                concurrency: 8,
                max_output_tokens: 128,
                temperature: 0.7,
            },
            results: vec![
                healthy("b"),
                BackendResult::unhealthy("a", "down"),
                healthy("c"),
            ],
        };

        let json = serde_json::to_string_pretty(&summary).unwrap();
        let parsed: Summary = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, summary);
        assert!(json.starts_with("{\n  \"model\": \"m\""));
    }

    #[test]
    fn test_integer_throughput_is_accepted() {
        // zero-duration runs written by older tooling store integer zeros
        let json = r#"{
            "backend": "x", "url": "http://x", "ok": true, "duration_s": 0,
            "total_requests": 1, "successful_requests": 1, "failed_requests": 0,
            "prompt_tokens": 3, "completion_tokens": 4,
            "output_throughput_tps": 0, "total_throughput_tps": 0,
            "request_throughput_rps": 0, "mean_latency_ms": 1.5,
            "p50_latency_ms": 1.5, "p99_latency_ms": 1.5
        }"#;
        let result: BackendResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.metrics().unwrap().request_throughput_rps, 0.0);
    }

    #[test]
    fn test_healthy_missing_field_is_rejected() {
        let json = r#"{"backend": "x", "url": "http://x", "ok": true}"#;
        let err = serde_json::from_str::<BackendResult>(json).unwrap_err();
        assert!(err.to_string().contains("duration_s"));
    }

    #[test]
    fn test_inconsistent_counts_are_rejected() {
        let mut value = serde_json::to_value(healthy("x")).unwrap();
        value["failed_requests"] = serde_json::json!(5);
        assert!(serde_json::from_value::<BackendResult>(value).is_err());
    }

    #[test]
    fn test_all_ok_and_failures() {
        let mut summary = Summary::new(RunParameters::default());
        assert!(summary.all_ok());

        summary.results.push(healthy("a"));
        summary.results.push(BackendResult::unhealthy("b", "down"));
        assert!(!summary.all_ok());

        let failed: Vec<&str> = summary.failures().map(|r| r.backend()).collect();
        assert_eq!(failed, vec!["b"]);
    }
}
