//! Configuration error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while assembling a profile configuration
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// One of the YAML files is missing from the config directory
    #[error("Configuration file not found: {}. Create it from the matching sample file", .path.display())]
    MissingFile { path: PathBuf },

    /// The requested profile has no entry in config.yml
    #[error("Profile '{profile}' not found in {}", .path.display())]
    ProfileNotFound { profile: String, path: PathBuf },

    /// The profile names an account that accounts.yml does not define
    #[error("Account '{account}' referenced by profile '{profile}' is not defined in accounts.yml")]
    AccountNotFound { profile: String, account: String },

    /// The profile names a region that regions.yml does not define
    #[error("Region '{region}' referenced by profile '{profile}' is not defined in regions.yml")]
    RegionNotFound { profile: String, region: String },

    /// A file could not be parsed or the merged values do not form a valid profile
    #[error("Failed to parse configuration: {message}")]
    ParseError { message: String },
}

impl From<figment::Error> for ConfigurationError {
    fn from(err: figment::Error) -> Self {
        Self::ParseError {
            message: err.to_string(),
        }
    }
}
