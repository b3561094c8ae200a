//! Worker statistics tracking

use crate::response::RequestOutcome;
use tokio::time::Instant;

/// Counters tracked by each worker, used for lifecycle logging
#[derive(Debug, Default, Clone)]
pub struct WorkerStats {
    /// Number of successfully completed requests
    pub completed: usize,

    /// Number of failed requests
    pub errors: usize,

    /// Worker start time
    pub started_at: Option<Instant>,

    /// Worker end time
    pub ended_at: Option<Instant>,
}

impl WorkerStats {
    /// Create new empty stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking (records start time)
    pub fn start(&mut self) {
        self.started_at = Some(Instant::now());
    }

    /// Stop tracking (records end time)
    pub fn stop(&mut self) {
        self.ended_at = Some(Instant::now());
    }

    /// Get total number of requests (completed + errors)
    pub fn total_requests(&self) -> usize {
        self.completed + self.errors
    }

    /// Count one outcome
    pub fn record(&mut self, outcome: &RequestOutcome) {
        if outcome.is_ok() {
            self.completed += 1;
        } else {
            self.errors += 1;
        }
    }

    /// Get elapsed time since start
    pub fn elapsed(&self) -> Option<std::time::Duration> {
        self.started_at.map(|start| {
            self.ended_at
                .map(|end| end.duration_since(start))
                .unwrap_or_else(|| start.elapsed())
        })
    }

    /// Merge stats from another worker
    pub fn merge(&mut self, other: &WorkerStats) {
        self.completed += other.completed;
        self.errors += other.errors;
    }
}
