//! Filesystem storage for the match log and campaign state.
//!
//! Layout under the data directory:
//! - `matches.jsonl`: every logged match, one JSON object per line
//! - `state/campaign_progress.json`: the current campaign
//! - `state/campaign_history.jsonl`: archived campaigns, append-only

pub mod jsonl;
pub mod state;

use std::path::PathBuf;
use thiserror::Error;

pub use jsonl::{JsonlReader, JsonlWriter};

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn matches_path(&self) -> PathBuf {
        self.data_dir.join("matches.jsonl")
    }

    pub fn state_dir(&self) -> PathBuf {
        self.data_dir.join("state")
    }

    pub fn campaign_progress_path(&self) -> PathBuf {
        self.state_dir().join("campaign_progress.json")
    }

    pub fn campaign_history_path(&self) -> PathBuf {
        self.state_dir().join("campaign_history.jsonl")
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}
