//! Text report rendering for benchmark summaries
//!
//! Produces a bordered, nvidia-smi style table. Every line of the output has
//! the same width; cells and padded lines are truncated rather than allowed
//! to overflow.

#![warn(missing_docs)]
#![warn(clippy::all)]

use chrono::{DateTime, Local, TimeZone};
use serve_bench_core::{BackendResult, Summary};

/// Title shown in the header block
pub const REPORT_TITLE: &str = "Benchmark-SMI";

/// Width between the outer `+`/`|` borders
const INNER_WIDTH: usize = 95;

/// Width of text inside `| ... |`
const PAD_WIDTH: usize = INNER_WIDTH - 2;

/// Longest error message shown in the Errors section
const MAX_ERROR_CHARS: usize = INNER_WIDTH - 6;

const COLUMNS: [(&str, usize); 6] = [
    ("Backend", 18),
    ("Req/s", 10),
    ("Out tok/s", 14),
    ("p50 ms", 14),
    ("p99 ms", 14),
    ("Status", 8),
];

/// Render `summary` with the current local time in the header
pub fn render_now(summary: &Summary) -> String {
    render_text_report(summary, &Local::now())
}

/// Render `summary` as a fixed-width text table
///
/// `generated_at` is printed in the title line as `%Y-%m-%d %H:%M:%S`.
pub fn render_text_report<Tz>(summary: &Summary, generated_at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let params = &summary.params;
    let mut lines = vec![
        border('='),
        pad(&format!(
            "{REPORT_TITLE} {}",
            generated_at.format("%Y-%m-%d %H:%M:%S")
        )),
        border('='),
        pad(&format!("Model: {}", params.model)),
        pad(&format!(
            "Prompts: {}  Concurrency: {}  Max output tokens: {}  Temp: {:?}",
            params.num_prompts, params.concurrency, params.max_output_tokens, params.temperature
        )),
        border('-'),
        row(COLUMNS.map(|(title, _)| title.to_string())),
        border('-'),
    ];

    for result in &summary.results {
        let cells = match result {
            BackendResult::Healthy(m) => [
                m.backend.clone(),
                format!("{:.2}", m.request_throughput_rps),
                format!("{:.2}", m.output_throughput_tps),
                format!("{:.2}", m.p50_latency_ms),
                format!("{:.2}", m.p99_latency_ms),
                "OK".to_string(),
            ],
            BackendResult::Unhealthy { backend, .. } => [
                backend.clone(),
                "FAIL".to_string(),
                "n/a".to_string(),
                "n/a".to_string(),
                "n/a".to_string(),
                "ERROR".to_string(),
            ],
        };
        lines.push(row(cells));
    }

    lines.push(border('-'));

    let failures: Vec<&BackendResult> = summary.failures().collect();
    if !failures.is_empty() {
        lines.push(pad("Errors:"));
        for failure in failures {
            let message = failure.error().filter(|e| !e.is_empty()).unwrap_or("unknown");
            let message: String = message
                .replace('\n', " ")
                .chars()
                .take(MAX_ERROR_CHARS)
                .collect();
            lines.push(pad(&format!("- {}: {}", failure.backend(), message)));
        }
        lines.push(border('-'));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn border(fill: char) -> String {
    format!("+{}+", fill.to_string().repeat(INNER_WIDTH))
}

fn pad(text: &str) -> String {
    format!("| {} |", fit(text, PAD_WIDTH))
}

fn row(cells: [String; 6]) -> String {
    let cells: Vec<String> = cells
        .iter()
        .zip(COLUMNS)
        .map(|(cell, (_, width))| fit(cell, width))
        .collect();
    format!("| {} |", cells.join(" | "))
}

/// Left-justify to exactly `width` characters, truncating if longer
fn fit(text: &str, width: usize) -> String {
    let truncated: String = text.chars().take(width).collect();
    format!("{truncated:<width$}")
}
