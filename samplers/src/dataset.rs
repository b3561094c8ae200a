//! Dataset loading with re-download of a corrupted default dataset

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::download::download_dataset;
use crate::error::DatasetError;
use crate::sharegpt::extract_prompts;

/// Where a corrupted default dataset can be fetched again
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetFallback {
    /// Download URL
    pub url: String,
    /// File name of the default dataset; only a file with this name is replaced
    pub default_name: String,
}

/// A dataset file on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetSource {
    path: PathBuf,
    fallback: Option<DatasetFallback>,
}

impl DatasetSource {
    /// Dataset at `path` with no re-download
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            fallback: None,
        }
    }

    /// Allow re-download when `url` and `default_name` are both non-empty
    pub fn with_fallback(mut self, url: Option<String>, default_name: Option<String>) -> Self {
        self.fallback = match (url, default_name) {
            (Some(url), Some(default_name)) if !url.is_empty() && !default_name.is_empty() => {
                Some(DatasetFallback { url, default_name })
            }
            _ => None,
        };
        self
    }

    /// Dataset path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The fallback, if this file is the configured default dataset
    fn default_fallback(&self) -> Option<&DatasetFallback> {
        let name = self.path.file_name()?.to_str()?;
        self.fallback.as_ref().filter(|f| f.default_name == name)
    }

    /// Load up to `limit` prompts in dataset order
    pub async fn load_prompts(&self, limit: usize) -> Result<Vec<String>, DatasetError> {
        let records = match (self.read_records().await, self.default_fallback()) {
            (Err(DatasetError::Parse { source, .. }), Some(fallback)) => {
                tracing::warn!(
                    path = %self.path.display(),
                    url = %fallback.url,
                    error = %source,
                    "Dataset JSON is invalid, re-downloading"
                );
                self.redownload(fallback).await?
            }
            (result, _) => result?,
        };

        let prompts = extract_prompts(&records, limit);
        if prompts.is_empty() {
            return Err(DatasetError::NoPrompts(self.path.clone()));
        }

        tracing::debug!(path = %self.path.display(), prompts = prompts.len(), "Dataset loaded");
        Ok(prompts)
    }

    async fn redownload(&self, fallback: &DatasetFallback) -> Result<Vec<Value>, DatasetError> {
        let wrap = |source: DatasetError| DatasetError::Redownload {
            path: self.path.clone(),
            url: fallback.url.clone(),
            source: Box::new(source),
        };

        download_dataset(&fallback.url, &self.path)
            .await
            .map_err(wrap)?;
        self.read_records().await.map_err(wrap)
    }

    async fn read_records(&self) -> Result<Vec<Value>, DatasetError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| DatasetError::Io {
                path: self.path.clone(),
                source,
            })?;

        let value: Value =
            serde_json::from_slice(&bytes).map_err(|source| DatasetError::Parse {
                path: self.path.clone(),
                source,
            })?;

        match value {
            Value::Array(records) => Ok(records),
            _ => Err(DatasetError::NotAnArray(self.path.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;
    use axum::Router;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};
    use tokio::net::TcpListener;

    const VALID: &str = r#"[
        {"conversations": [{"from": "human", "value": "first"}]},
        {"conversations": [{"from": "human", "value": "second"}]}
    ]"#;

    async fn serve_body(body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let router = Router::new().route("/sharegpt.json", get(move || async move { body }));
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}/sharegpt.json")
    }

    #[tokio::test]
    async fn test_load_valid_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{VALID}").unwrap();

        let prompts = DatasetSource::new(file.path()).load_prompts(10).await.unwrap();
        assert_eq!(prompts, vec!["first", "second"]);

        let prompts = DatasetSource::new(file.path()).load_prompts(1).await.unwrap();
        assert_eq!(prompts, vec!["first"]);
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let err = DatasetSource::new(dir.path().join("absent.json"))
            .load_prompts(5)
            .await
            .unwrap_err();
        assert!(matches!(err, DatasetError::Io { .. }));
    }

    #[tokio::test]
    async fn test_invalid_json_without_fallback_is_fatal() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "[{{truncated").unwrap();

        let err = DatasetSource::new(file.path())
            .with_fallback(Some("http://127.0.0.1:9/x".into()), Some("other.json".into()))
            .load_prompts(5)
            .await
            .unwrap_err();
        assert!(matches!(err, DatasetError::Parse { .. }));
        assert!(err.to_string().contains("delete the file"));
    }

    #[tokio::test]
    async fn test_non_array_and_no_prompts() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"conversations": []}}"#).unwrap();
        let err = DatasetSource::new(file.path()).load_prompts(5).await.unwrap_err();
        assert!(matches!(err, DatasetError::NotAnArray(_)));

        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"[{{"conversations": [{{"from": "gpt", "value": "x"}}]}}]"#).unwrap();
        let err = DatasetSource::new(file.path()).load_prompts(5).await.unwrap_err();
        assert!(matches!(err, DatasetError::NoPrompts(_)));
    }

    #[tokio::test]
    async fn test_corrupt_default_dataset_is_redownloaded() {
        let url = serve_body(VALID).await;
        let dir = tempdir().unwrap();
        let path = dir.path().join("sharegpt.json");
        std::fs::write(&path, "{not json").unwrap();

        let prompts = DatasetSource::new(&path)
            .with_fallback(Some(url), Some("sharegpt.json".into()))
            .load_prompts(10)
            .await
            .unwrap();

        assert_eq!(prompts, vec!["first", "second"]);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), VALID);
    }

    #[tokio::test]
    async fn test_redownload_still_invalid_is_fatal() {
        let url = serve_body("<html>not json</html>").await;
        let dir = tempdir().unwrap();
        let path = dir.path().join("sharegpt.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = DatasetSource::new(&path)
            .with_fallback(Some(url), Some("sharegpt.json".into()))
            .load_prompts(10)
            .await
            .unwrap_err();

        assert!(matches!(err, DatasetError::Redownload { .. }));
    }

    #[test]
    fn test_fallback_requires_both_values() {
        let source = DatasetSource::new("/data/sharegpt.json");
        assert!(source
            .clone()
            .with_fallback(Some("http://x".into()), None)
            .default_fallback()
            .is_none());
        assert!(source
            .clone()
            .with_fallback(Some(String::new()), Some("sharegpt.json".into()))
            .default_fallback()
            .is_none());
        assert!(source
            .with_fallback(Some("http://x".into()), Some("sharegpt.json".into()))
            .default_fallback()
            .is_some());
    }
}
