//! Local filesystem persistence for benchmark summaries
//!
//! The JSON written by [`write_summary`] is also the input format of
//! [`aggregate_files`], so aggregates can themselves be aggregated.

#![warn(missing_docs)]
#![warn(clippy::all)]

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serve_bench_core::{aggregate_summaries, ResultsDocument, RunParameters, Summary};
use thiserror::Error;

/// Persistence failure, annotated with the offending path
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing a file failed
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// A file did not hold a valid summary document
    #[error("invalid summary JSON in {path}: {source}")]
    Json {
        /// File path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: serde_json::Error,
    },

    /// Aggregation was called without inputs
    #[error("no input files to aggregate")]
    NoInputs,
}

impl StorageError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        StorageError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Write `summary` as pretty-printed JSON, creating parent directories
pub fn write_summary(path: &Path, summary: &Summary) -> Result<(), StorageError> {
    let mut json = serde_json::to_string_pretty(summary).map_err(|source| StorageError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    json.push('\n');
    write_file(path, json.as_bytes())?;

    tracing::info!(path = %path.display(), results = summary.results.len(), "Summary written");
    Ok(())
}

/// Write a rendered text report, creating parent directories
pub fn write_text_report(path: &Path, report: &str) -> Result<(), StorageError> {
    write_file(path, report.as_bytes())?;
    tracing::info!(path = %path.display(), "Text report written");
    Ok(())
}

/// Read the `results` of a stored summary
///
/// Run parameters in the file are not required and are ignored.
pub fn read_results(path: &Path) -> Result<ResultsDocument, StorageError> {
    let bytes = fs::read(path).map_err(|e| StorageError::io(path, e))?;
    serde_json::from_slice(&bytes).map_err(|source| StorageError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Combine stored summaries into `dest`
///
/// Every input is read and validated before anything is written, so a bad
/// input leaves `dest` untouched.
pub fn aggregate_files(
    dest: &Path,
    inputs: &[PathBuf],
    params: RunParameters,
) -> Result<Summary, StorageError> {
    if inputs.is_empty() {
        return Err(StorageError::NoInputs);
    }

    let documents = inputs
        .iter()
        .map(|path| read_results(path))
        .collect::<Result<Vec<_>, _>>()?;

    let summary = aggregate_summaries(params, documents);
    write_summary(dest, &summary)?;

    tracing::info!(
        inputs = inputs.len(),
        results = summary.results.len(),
        dest = %dest.display(),
        "Aggregated summaries"
    );
    Ok(summary)
}

fn write_file(path: &Path, contents: &[u8]) -> Result<(), StorageError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
    }
    let mut file = fs::File::create(path).map_err(|e| StorageError::io(path, e))?;
    file.write_all(contents)
        .map_err(|e| StorageError::io(path, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serve_bench_core::{BackendMetrics, BackendResult};
    use tempfile::tempdir;

    fn params(model: &str) -> RunParameters {
        RunParameters {
            model: model.into(),
            num_prompts: 8,
            concurrency: 2,
            max_output_tokens: 64,
            temperature: 0.5,
        }
    }

    fn healthy(name: &str) -> BackendResult {
        BackendResult::Healthy(BackendMetrics {
            backend: name.into(),
            url: format!("http://{name}:8000"),
            duration_s: 2.0,
            total_requests: 8,
            successful_requests: 7,
            failed_requests: 1,
            prompt_tokens: 700,
            completion_tokens: 448,
            output_throughput_tps: 224.0,
            total_throughput_tps: 574.0,
            request_throughput_rps: 3.5,
            mean_latency_ms: 512.34,
            p50_latency_ms: 498.1,
            p99_latency_ms: 1020.77,
        })
    }

    fn summary(model: &str, results: Vec<BackendResult>) -> Summary {
        Summary {
            params: params(model),
            results,
        }
    }

    fn backend_names(summary: &Summary) -> Vec<&str> {
        summary.results.iter().map(BackendResult::backend).collect()
    }

    #[test]
    fn test_write_read_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/out/summary.json");
        let original = summary(
            "m",
            vec![healthy("a"), BackendResult::unhealthy("b", "Health check failed at http://b/health")],
        );

        write_summary(&path, &original).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("{\n  \"model\": \"m\""));

        let parsed: Summary = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, original);
        assert_eq!(read_results(&path).unwrap().results, original.results);
    }

    #[test]
    fn test_aggregate_files_in_input_order() {
        let dir = tempdir().unwrap();
        let first = dir.path().join("shard1.json");
        let second = dir.path().join("shard2.json");
        write_summary(&first, &summary("shard", vec![healthy("A")])).unwrap();
        write_summary(
            &second,
            &summary("shard", vec![healthy("B"), BackendResult::unhealthy("C", "down")]),
        )
        .unwrap();

        let dest = dir.path().join("combined.json");
        let merged = aggregate_files(&dest, &[first, second], params("combined")).unwrap();

        assert_eq!(backend_names(&merged), vec!["A", "B", "C"]);
        assert_eq!(merged.params.model, "combined");

        let stored: Summary = serde_json::from_str(&fs::read_to_string(&dest).unwrap()).unwrap();
        assert_eq!(stored, merged);
    }

    #[test]
    fn test_aggregate_of_aggregate() {
        let dir = tempdir().unwrap();
        let paths: Vec<PathBuf> = ["A", "B", "C"]
            .iter()
            .map(|name| {
                let path = dir.path().join(format!("{name}.json"));
                write_summary(&path, &summary("m", vec![healthy(name)])).unwrap();
                path
            })
            .collect();

        let ab = dir.path().join("ab.json");
        aggregate_files(&ab, &paths[..2], params("m")).unwrap();
        let ab_c = aggregate_files(
            &dir.path().join("ab_c.json"),
            &[ab, paths[2].clone()],
            params("m"),
        )
        .unwrap();
        let abc = aggregate_files(&dir.path().join("abc.json"), &paths, params("m")).unwrap();

        assert_eq!(ab_c.results, abc.results);
    }

    #[test]
    fn test_bad_input_writes_nothing() {
        let dir = tempdir().unwrap();
        let good = dir.path().join("good.json");
        write_summary(&good, &summary("m", vec![healthy("A")])).unwrap();
        let bad = dir.path().join("bad.json");
        fs::write(&bad, "{\"results\": [").unwrap();
        let missing = dir.path().join("missing.json");
        let dest = dir.path().join("combined.json");

        let err = aggregate_files(&dest, &[good.clone(), bad], params("m")).unwrap_err();
        assert!(matches!(err, StorageError::Json { .. }));
        assert!(!dest.exists());

        let err = aggregate_files(&dest, &[good, missing], params("m")).unwrap_err();
        assert!(matches!(err, StorageError::Io { .. }));
        assert!(!dest.exists());
    }

    #[test]
    fn test_results_only_document_is_accepted() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("minimal.json");
        fs::write(
            &input,
            r#"{"results": [{"backend": "x", "ok": false, "error": "boom"}]}"#,
        )
        .unwrap();

        let merged = aggregate_files(&dir.path().join("out.json"), &[input], params("m")).unwrap();
        assert_eq!(merged.results, vec![BackendResult::unhealthy("x", "boom")]);
    }

    #[test]
    fn test_no_inputs() {
        let dir = tempdir().unwrap();
        let err = aggregate_files(&dir.path().join("out.json"), &[], params("m")).unwrap_err();
        assert!(matches!(err, StorageError::NoInputs));
    }

    #[test]
    fn test_write_text_report() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("reports/summary.txt");
        write_text_report(&path, "+---+\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "+---+\n");
    }
}
