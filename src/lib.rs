//! Site-Text: a batch web content extractor
//!
//! This crate fetches a list of seed URLs, extracts clean text from HTML pages
//! and PDF documents, and stores one text file per page for downstream indexing.

pub mod config;
pub mod extract;
pub mod output;
pub mod scrape;
pub mod state;
pub mod worklist;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Site-Text runs
///
/// Every variant here aborts the whole run. Failures of a single work item
/// are reported through [`scrape::ItemError`] and never surface as a
/// `ScrapeError`.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Work list error: {0}")]
    WorkList(#[from] WorkListError),

    #[error("Archive error: {0}")]
    Archive(#[from] output::ArchiveError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Failed to serialize results: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Worker task failed: {0}")]
    Worker(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Errors raised while loading the work list
#[derive(Debug, Error)]
pub enum WorkListError {
    #[error("Failed to read work list {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse work list {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Work list entry {index} is not a JSON object")]
    NotAnObject { index: usize },

    #[error("Work list entry {index} has no string \"url\" field")]
    MissingUrl { index: usize },
}

/// Result type alias for Site-Text operations
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use scrape::{run_scrape, Coordinator, RunReport};
pub use state::ItemState;
pub use worklist::{load_work_list, WorkItem};
