//! Document extraction errors

use thiserror::Error;

/// Errors that can occur during document extraction
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Failed to connect to the extraction service
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request to the extraction service failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// The uploaded document cannot be processed
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// The service reported a failed analysis
    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),

    /// Invalid response from the service
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Polling did not reach a terminal status in time
    #[error("Extraction polling timed out after {0}ms")]
    PollTimedOut(u64),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Provider not available (credentials absent)
    #[error("Provider not available: {0}")]
    NotAvailable(String),
}

impl From<reqwest::Error> for DocumentError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::RequestFailed(format!("request timed out: {err}"))
        } else if err.is_connect() {
            Self::ConnectionFailed(err.to_string())
        } else {
            Self::RequestFailed(err.to_string())
        }
    }
}
