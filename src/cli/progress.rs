//! Console progress: per-backend status lines plus a request progress bar

use std::sync::Mutex;

use indicatif::{ProgressBar, ProgressStyle};
use serve_bench_core::{Backend, BackendResult, ProgressSink, RequestOutcome};

const BAR_TEMPLATE: &str =
    "  {spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}";

/// Prints the before/after line for each backend and a bar while it runs
#[derive(Default)]
pub struct ConsoleProgress {
    bar: Mutex<Option<ProgressBar>>,
}

impl ConsoleProgress {
    pub fn new() -> Self {
        Self::default()
    }

    fn new_bar(total: usize) -> ProgressBar {
        let bar = ProgressBar::new(total as u64);
        match ProgressStyle::default_bar().template(BAR_TEMPLATE) {
            Ok(style) => bar.set_style(style.progress_chars("#>-")),
            Err(e) => tracing::debug!(error = %e, "Invalid progress template, using default"),
        }
        bar
    }

    fn take_bar(&self) -> Option<ProgressBar> {
        self.bar.lock().ok().and_then(|mut slot| slot.take())
    }
}

impl ProgressSink for ConsoleProgress {
    fn backend_started(&self, backend: &Backend, total_requests: usize) {
        println!("\n▶ Running {} at {} ...", backend.name, backend.url);
        if let Ok(mut slot) = self.bar.lock() {
            *slot = Some(Self::new_bar(total_requests));
        }
    }

    fn request_completed(&self, _backend: &Backend, outcome: &RequestOutcome) {
        let Ok(slot) = self.bar.lock() else { return };
        if let Some(bar) = slot.as_ref() {
            if let Some(failure) = &outcome.error {
                bar.set_message(format!("last error: {}", failure.kind));
            }
            bar.inc(1);
        }
    }

    fn backend_finished(&self, backend: &Backend, result: &BackendResult) {
        if let Some(bar) = self.take_bar() {
            bar.finish_and_clear();
        }
        println!("{}", status_line(&backend.name, result));
    }
}

/// The one-line result printed after a backend finishes
pub(crate) fn status_line(name: &str, result: &BackendResult) -> String {
    match result {
        BackendResult::Healthy(m) => format!(
            "  ✓ {name}: {:.2} req/s, output {:.2} tok/s, p50 {:.1} ms, p99 {:.1} ms",
            m.request_throughput_rps, m.output_throughput_tps, m.p50_latency_ms, m.p99_latency_ms
        ),
        BackendResult::Unhealthy { error, .. } => format!("  ✗ {name}: {error}"),
    }
}
