//! Configuration command handlers

use crate::cli::commands::ConfigAction;
use crate::error::Result;
use crate::output::{compress_path, json_output, print_field};
use aruba_central_common::ProfileConfig;
use console::style;
use std::process::ExitCode;

/// Handle `config` subcommands
pub fn handle_config(action: ConfigAction, config: &ProfileConfig) -> Result<ExitCode> {
    match action {
        ConfigAction::Show { json } => show_config(config, json)?,
    }
    Ok(ExitCode::SUCCESS)
}

fn show_config(config: &ProfileConfig, json: bool) -> Result<()> {
    let config = config.redacted();
    if json {
        return json_output(&config);
    }

    println!("Profile {}", style(&config.profile).bold());
    print_field("URL", &config.url);
    print_field("Username", &config.username);
    print_field("Password", &config.password);
    print_field("Client ID", &config.client_id);
    print_field("Client secret", &config.client_secret);
    print_field("Customer ID", &config.customer_id);
    print_field("Timeout", format!("{}s", config.timeout_secs));
    print_field(
        "Client list timeout",
        format!("{}s", config.client_list_timeout_secs),
    );
    print_field("Config path", compress_path(&config.config_path));
    Ok(())
}
