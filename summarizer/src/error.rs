//! Error types for the summary service client

use thiserror::Error;

/// Errors that can occur when requesting a project summary
#[derive(Debug, Error)]
pub enum SummarizerError {
    /// Missing `DEBRISFLOW_SUMMARIZER_API_KEY` environment variable
    #[error("Missing DEBRISFLOW_SUMMARIZER_API_KEY environment variable")]
    MissingApiKey,

    /// HTTP request failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Response parsing failed
    #[error("Response parsing failed: {0}")]
    ResponseParseFailed(String),

    /// Rate limited - too many requests
    #[error("Rate limited - too many requests")]
    RateLimited,

    /// Unauthorized - invalid API key
    #[error("Unauthorized - invalid API key")]
    Unauthorized,

    /// Service returned an error
    #[error("Service error (status {status}): {message}")]
    ServiceError {
        /// HTTP status code
        status: u16,
        /// Error message from the service
        message: String,
    },
}
