//! Main entry point for the Aruba Central CLI

use aruba_central_cli::cli::Args;
use clap::Parser;
use color_eyre::eyre::{eyre, Result};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    color_eyre::config::HookBuilder::default()
        .display_location_section(false)
        .display_env_section(false)
        .install()?;

    // Silent unless -v or RUST_LOG; stdout is parsed by collectd and Nagios
    let binary_name = env!("CARGO_BIN_NAME").replace('-', "_");
    let default_filter = format!("{binary_name}=warn,aruba_central_cli=warn,aruba_central_sdk=warn");
    aruba_central_common::logging::init_cli_logging(&args.verbosity, &default_filter)
        .map_err(|e| eyre!("Failed to initialize logging: {}", e))?;

    Ok(args.run().await?)
}
