//! Prompt datasets
//!
//! Loads ShareGPT-style conversation dumps and turns them into an ordered
//! list of user prompts. A corrupted copy of the default dataset is fetched
//! again from its download URL before giving up.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod dataset;
mod download;
mod error;
mod sharegpt;

pub use dataset::{DatasetFallback, DatasetSource};
pub use download::{download_dataset, DOWNLOAD_TIMEOUT};
pub use error::DatasetError;
pub use sharegpt::{extract_prompts, USER_ROLES};
