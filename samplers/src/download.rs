//! Dataset download

use std::path::Path;
use std::time::Duration;

use futures::StreamExt;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::error::DatasetError;

/// Cap on the whole download
pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(120);

/// Stream `url` into `dest`, replacing any existing file
pub async fn download_dataset(url: &str, dest: &Path) -> Result<(), DatasetError> {
    let download_err = |message: String| DatasetError::Download {
        url: url.to_string(),
        message,
    };
    let io_err = |source: std::io::Error| DatasetError::Io {
        path: dest.to_path_buf(),
        source,
    };

    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
    }

    let client = reqwest::Client::builder()
        .timeout(DOWNLOAD_TIMEOUT)
        .build()
        .map_err(|e| download_err(e.to_string()))?;

    let response = client
        .get(url)
        .send()
        .await
        .and_then(reqwest::Response::error_for_status)
        .map_err(|e| download_err(e.to_string()))?;

    let mut file = File::create(dest).await.map_err(io_err)?;
    let mut stream = response.bytes_stream();
    let mut written = 0u64;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| download_err(e.to_string()))?;
        file.write_all(&chunk).await.map_err(io_err)?;
        written += chunk.len() as u64;
    }
    file.flush().await.map_err(io_err)?;

    tracing::info!(url, path = %dest.display(), bytes = written, "Dataset downloaded");
    Ok(())
}
