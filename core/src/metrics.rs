//! Latency statistics and throughput derivation
//!
//! Everything here is order-independent: the same multiset of outcomes gives
//! the same statistics regardless of completion order.

use crate::response::{RequestOutcome, TokenUsage};
use crate::summary::BackendMetrics;
use std::time::Duration;

/// Linearly interpolated percentile (NumPy's default "linear" method)
///
/// `q` is a quantile in `[0, 1]`. Samples are sorted internally, so any order
/// is accepted. Returns `0.0` for an empty slice.
pub fn percentile(samples: &[f64], q: f64) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }

    let mut sorted = samples.to_vec();
    sorted.sort_by(f64::total_cmp);
    percentile_sorted(&sorted, q)
}

/// Same as [`percentile`] for an already ascending slice
pub fn percentile_sorted(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }

    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;

    if lo == hi {
        sorted[lo]
    } else {
        let frac = pos - lo as f64;
        sorted[lo] * (1.0 - frac) + sorted[hi] * frac
    }
}

/// Arithmetic mean; `0.0` for an empty slice
pub fn mean(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        0.0
    } else {
        samples.iter().sum::<f64>() / samples.len() as f64
    }
}

/// Round to two decimal places for the serialized report
///
/// Goes through the shortest decimal formatting so ties resolve on the exact
/// binary value, like the reports produced by earlier tooling.
pub fn round2(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{value:.2}").parse().unwrap_or(value)
}

/// `count / secs`, or `0.0` when no time elapsed
fn per_second(count: f64, secs: f64) -> f64 {
    if secs > 0.0 {
        count / secs
    } else {
        0.0
    }
}

/// Unrounded statistics over one backend's outcomes
#[derive(Debug, Clone, PartialEq)]
pub struct OutcomeStats {
    /// Wall-clock span of the whole batch
    pub duration_s: f64,
    /// Prompts dispatched
    pub total_requests: usize,
    /// Outcomes with `ok == true`
    pub successful_requests: usize,
    /// `total_requests - successful_requests`
    pub failed_requests: usize,
    /// Tokens summed over successful outcomes
    pub tokens: TokenUsage,
    /// `successful_requests / duration_s`
    pub request_throughput_rps: f64,
    /// `completion_tokens / duration_s`
    pub output_throughput_tps: f64,
    /// `(prompt_tokens + completion_tokens) / duration_s`
    pub total_throughput_tps: f64,
    /// Mean over every outcome, failures included
    pub mean_latency_ms: f64,
    /// Median over every outcome
    pub p50_latency_ms: f64,
    /// 99th percentile over every outcome
    pub p99_latency_ms: f64,
}

impl OutcomeStats {
    /// Derive statistics from raw outcomes
    ///
    /// `total_requests` is the number of prompts dispatched. Latency
    /// statistics include failed requests since they still consumed
    /// wall-clock time; token sums include successful requests only.
    pub fn from_outcomes(
        outcomes: &[RequestOutcome],
        total_requests: usize,
        duration: Duration,
    ) -> Self {
        let successful_requests = outcomes.iter().filter(|o| o.is_ok()).count();
        let failed_requests = total_requests.saturating_sub(successful_requests);

        let mut tokens = TokenUsage::default();
        for outcome in outcomes.iter().filter(|o| o.is_ok()) {
            tokens += outcome.usage;
        }

        let mut latencies: Vec<f64> = outcomes.iter().map(|o| o.latency_ms).collect();
        latencies.sort_by(f64::total_cmp);

        let secs = duration.as_secs_f64();

        Self {
            duration_s: secs,
            total_requests,
            successful_requests,
            failed_requests,
            tokens,
            request_throughput_rps: per_second(successful_requests as f64, secs),
            output_throughput_tps: per_second(tokens.completion_tokens as f64, secs),
            total_throughput_tps: per_second(tokens.total() as f64, secs),
            mean_latency_ms: mean(&latencies),
            p50_latency_ms: percentile_sorted(&latencies, 0.50),
            p99_latency_ms: percentile_sorted(&latencies, 0.99),
        }
    }

    /// Round every float and attach the backend identity
    pub fn into_metrics(self, backend: impl Into<String>, url: impl Into<String>) -> BackendMetrics {
        BackendMetrics {
            backend: backend.into(),
            url: url.into(),
            duration_s: round2(self.duration_s),
            total_requests: self.total_requests as u64,
            successful_requests: self.successful_requests as u64,
            failed_requests: self.failed_requests as u64,
            prompt_tokens: self.tokens.prompt_tokens,
            completion_tokens: self.tokens.completion_tokens,
            output_throughput_tps: round2(self.output_throughput_tps),
            total_throughput_tps: round2(self.total_throughput_tps),
            request_throughput_rps: round2(self.request_throughput_rps),
            mean_latency_ms: round2(self.mean_latency_ms),
            p50_latency_ms: round2(self.p50_latency_ms),
            p99_latency_ms: round2(self.p99_latency_ms),
        }
    }
}
