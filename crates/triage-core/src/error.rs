//! Error types for triage

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Malformed or incomplete query/filter input. Valid flag
    /// combinations never produce this.
    #[error("Invalid query: {0}")]
    Build(String),

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error("Issue not found: {0}")]
    NotFound(u64),

    #[error("Tracker request failed with status {status}: {url}")]
    Api { status: u16, url: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("No config found at {0}")]
    ConfigNotFound(PathBuf),

    #[error("Invalid config: {0}")]
    Config(String),

    #[error("Cannot determine repository: {0}")]
    Remote(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// A filter flag value that cannot be applied to the issue field it targets.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("Malformed label expression '{0}'")]
    MalformedLabels(String),

    #[error("Invalid login '{value}' for --{flag}")]
    InvalidLogin { flag: &'static str, value: String },
}
