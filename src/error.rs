//! Error types for pr-sweep

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// All errors surfaced by pr-sweep operations
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid configuration or flag combination
    #[error("{0}")]
    Config(String),

    /// Token resolution failed
    #[error("{0}")]
    Auth(String),

    /// GitHub API call failed
    #[error("{0}")]
    GitHubApi(String),

    /// Local I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Report serialization failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Unexpected internal state
    #[error("internal error: {0}")]
    Internal(String),
}
