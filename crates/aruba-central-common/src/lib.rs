//! Shared building blocks for the Aruba Central tools
//!
//! - `config`: profile configuration assembled from the YAML files in a
//!   config directory
//! - `logging`: tracing subscriber setup shared by every binary

pub mod config;
pub mod error;
pub mod logging;

pub use config::{ProfileConfig, DEFAULT_CONFIG_PATH, DEFAULT_PROFILE};
pub use error::ConfigurationError;
