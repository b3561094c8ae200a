//! Dataset errors

use std::path::PathBuf;

use thiserror::Error;

/// Failure to produce prompts from a dataset
#[derive(Debug, Error)]
pub enum DatasetError {
    /// The file could not be read or written
    #[error("failed to access dataset at {path}: {source}")]
    Io {
        /// Dataset path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON and cannot be re-downloaded
    #[error(
        "failed to parse dataset JSON at {path}: {source}. If using the default ShareGPT \
         dataset, delete the file to force re-download or provide a valid dataset"
    )]
    Parse {
        /// Dataset path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: serde_json::Error,
    },

    /// The top-level JSON value is not an array of records
    #[error("dataset at {0} is not a JSON array of conversations")]
    NotAnArray(PathBuf),

    /// Fetching the dataset failed
    #[error("failed to download dataset from {url}: {message}")]
    Download {
        /// Source URL
        url: String,
        /// What went wrong
        message: String,
    },

    /// The default dataset was still unusable after fetching it again
    #[error("dataset at {path} is invalid even after re-download from {url}: {source}")]
    Redownload {
        /// Dataset path
        path: PathBuf,
        /// Source URL
        url: String,
        /// The failure from the second attempt
        #[source]
        source: Box<DatasetError>,
    },

    /// No record contained a usable user turn
    #[error("no usable prompts found in dataset at {0}")]
    NoPrompts(PathBuf),
}
