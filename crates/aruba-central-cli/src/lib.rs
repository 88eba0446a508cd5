//! # Aruba Central CLI
//!
//! The `aruba-central` binary bundles the tools that sit on top of the SDK:
//! - collectd exec pollers for client, SSID and VC counts
//! - a Nagios check for down APs in a virtual controller cluster
//! - bulk AP renaming from a CSV export
//! - token and configuration maintenance
//!
//! ## Architecture
//!
//! - Clap-based argument parsing with derive macros
//! - One handler module per command family
//! - Pure formatting and evaluation helpers, so the output formats can be
//!   tested without a network

pub mod cli;
pub mod error;
pub mod output;

pub use cli::*;
pub use error::*;
