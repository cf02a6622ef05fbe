//! Error types for multipick
//!
//! Fetch failures are the only errors the picker itself ever sees; everything
//! else is setup or I/O around it.

use thiserror::Error;

/// Why a single search request did not produce a result list
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    #[error("Network error talking to '{url}': {message}")]
    Network { url: String, message: String },

    #[error("Request to '{0}' timed out")]
    Timeout(String),

    #[error("Search provider answered HTTP {status} for '{url}'")]
    Status { status: u16, url: String },

    #[error("Malformed search response: {0}")]
    MalformedBody(String),

    #[error("Search provider failed: {0}")]
    Provider(String),
}

impl FetchFailure {
    /// Build from a transport error, keeping timeouts distinguishable
    pub fn from_reqwest(url: &str, err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchFailure::Timeout(url.to_string())
        } else if err.is_decode() {
            FetchFailure::MalformedBody(err.to_string())
        } else {
            FetchFailure::Network {
                url: url.to_string(),
                message: err.to_string(),
            }
        }
    }

    /// Short form for the status bar
    pub fn summary(&self) -> String {
        match self {
            FetchFailure::Network { .. } => "network error".to_string(),
            FetchFailure::Timeout(_) => "request timed out".to_string(),
            FetchFailure::Status { status, .. } => format!("HTTP {}", status),
            FetchFailure::MalformedBody(_) => "malformed response".to_string(),
            FetchFailure::Provider(_) => "provider error".to_string(),
        }
    }
}

/// Main error type for multipick operations
#[derive(Error, Debug)]
pub enum PickError {
    #[error(transparent)]
    Fetch(#[from] FetchFailure),

    #[error("Invalid endpoint '{0}': {1}")]
    InvalidEndpoint(String, String),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Clipboard error: {0}")]
    Clipboard(String),

    #[error("Failed to open '{0}': {1}")]
    Open(String, String),

    #[error("Logging setup failed: {0}")]
    Logging(String),
}

/// Result type alias for multipick operations
pub type Result<T> = std::result::Result<T, PickError>;

impl PickError {
    /// Check if the picker can keep running after this error
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            PickError::Fetch(_) | PickError::Clipboard(_) | PickError::Open(_, _)
        )
    }
}
