//! Error types for the Aruba Central CLI

use color_eyre::eyre::Report;
use thiserror::Error;

/// CLI error type with minimal variants
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration file issues
    #[error(transparent)]
    Config(#[from] aruba_central_common::ConfigurationError),

    /// API communication errors
    #[error(transparent)]
    Api(#[from] aruba_central_sdk::ApiError),

    /// Authentication issues
    #[error(transparent)]
    Auth(#[from] aruba_central_sdk::AuthError),

    /// Reading input or writing output failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The AP list could not be read
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Everything else (using color-eyre's Report for rich errors)
    #[error(transparent)]
    Internal(#[from] Report),
}

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
