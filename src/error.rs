use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcwatchError {
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("malformed response from {url}: {reason}")]
    MalformedBody { url: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Could not write {path}: {source}")]
    Export {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to register signal handler: {0}")]
    SignalHandler(String),

    #[error("Shell completion error: {0}")]
    ShellCompletion(String),
}

impl ProcwatchError {
    /// True for network, status, and body failures of an API call.
    pub fn is_fetch_error(&self) -> bool {
        matches!(
            self,
            ProcwatchError::Http { .. }
                | ProcwatchError::Timeout { .. }
                | ProcwatchError::Status { .. }
                | ProcwatchError::MalformedBody { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ProcwatchError>;
