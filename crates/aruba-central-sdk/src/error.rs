//! Error types for the Aruba Central SDK

use crate::auth::AuthError;
use thiserror::Error;

/// Result type alias for SDK operations
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors returned by [`crate::ArubaCentralClient`]
#[derive(Debug, Error)]
pub enum ApiError {
    /// The API answered with a non-success status
    #[error("API request failed with status {status}: {body}")]
    RequestFailed { status: u16, body: String },

    /// HTTP client error (connect failure, timeout, body decode)
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// No usable access token
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Not found
    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    /// The response body lacked an expected field
    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    /// Invalid request
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },
}

impl ApiError {
    /// Whether a long-running poller should log this and try again next tick
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::HttpClient(_) => true,
            ApiError::RequestFailed { status, .. } => *status == 429 || *status >= 500,
            ApiError::Auth(e) => e.is_transient(),
            ApiError::NotFound { .. }
            | ApiError::InvalidResponse { .. }
            | ApiError::InvalidRequest { .. } => false,
        }
    }
}
