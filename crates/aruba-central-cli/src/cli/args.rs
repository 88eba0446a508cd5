use crate::cli::{commands::Commands, handlers};
use crate::error::Result;
use aruba_central_common::{ProfileConfig, DEFAULT_CONFIG_PATH, DEFAULT_PROFILE};
use clap::Parser;
use clap_verbosity_flag::{OffLevel, Verbosity};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;

/// Aruba Central CLI - monitoring and maintenance for Aruba Central
#[derive(Parser, Debug)]
#[command(
    name = "aruba-central",
    version,
    about = "Aruba Central monitoring and maintenance tools",
    long_about = "Monitoring and maintenance tools for Aruba Central.

COLLECTD (exec plugin):
  aruba-central clients [-g GROUP]        # Client totals, health, band, OS, connection
  aruba-central ssids                     # Clients per SSID
  aruba-central vcs [-g GROUP]            # Clients per virtual controller

NAGIOS:
  aruba-central check-vc -V BRO -W 1 -C 5 # Down APs in a VC cluster

MAINTENANCE:
  aruba-central rename-aps aps.csv        # Set AP hostnames from a CSV export
  aruba-central login                     # Force a fresh login
  aruba-central logout                    # Delete the cached token
  aruba-central token                     # Show cached token status
  aruba-central config show               # Show the merged profile"
)]
pub struct Args {
    /// Directory holding config.yml, accounts.yml and regions.yml
    #[arg(
        short = 'c',
        long,
        global = true,
        env = "ARUBA_CENTRAL_CONFIG_PATH",
        default_value = DEFAULT_CONFIG_PATH
    )]
    pub config_path: PathBuf,

    /// Profile name in config.yml
    #[arg(
        short = 'P',
        long,
        global = true,
        env = "ARUBA_CENTRAL_PROFILE",
        default_value = DEFAULT_PROFILE
    )]
    pub profile: String,

    #[command(flatten)]
    pub verbosity: Verbosity<OffLevel>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Args {
    /// Execute the CLI command
    pub async fn run(self) -> Result<ExitCode> {
        let config_path = expand_path(&self.config_path);
        debug!(
            "Using profile {} from {}",
            self.profile,
            config_path.display()
        );

        match self.command {
            // collectd pollers
            Commands::Clients { group, poll } => {
                let config = load_profile(&self.profile, &config_path)?;
                handlers::collectd::handle_clients(config, group, poll).await
            }
            Commands::Ssids { poll } => {
                let config = load_profile(&self.profile, &config_path)?;
                handlers::collectd::handle_ssids(config, poll).await
            }
            Commands::Vcs { group, poll } => {
                let config = load_profile(&self.profile, &config_path)?;
                handlers::collectd::handle_vcs(config, group, poll).await
            }

            // Nagios; configuration problems are reported as UNKNOWN
            Commands::CheckVc { options } => {
                handlers::check::handle_check_vc(&self.profile, &config_path, options).await
            }

            // Maintenance
            Commands::RenameAps { csv, filter } => {
                let config = load_profile(&self.profile, &config_path)?;
                handlers::rename::handle_rename_aps(config, &csv, filter.as_deref()).await
            }
            Commands::Login => {
                let config = load_profile(&self.profile, &config_path)?;
                handlers::auth::handle_login(config).await
            }
            Commands::Logout => handlers::auth::handle_logout(&self.profile, &config_path).await,
            Commands::Token => handlers::auth::handle_token(&self.profile, &config_path).await,
            Commands::Config { action } => {
                let config = load_profile(&self.profile, &config_path)?;
                handlers::config::handle_config(action, &config)
            }
        }
    }
}

/// Load the merged profile for a command
pub fn load_profile(profile: &str, config_path: &Path) -> Result<ProfileConfig> {
    Ok(ProfileConfig::load(profile, config_path)?)
}

/// Expand `~` and environment variables in a path
pub fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    match shellexpand::full(&raw) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(_) => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::ConfigAction;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["aruba-central", "token"]).unwrap();
        assert_eq!(args.profile, DEFAULT_PROFILE);
        assert_eq!(args.config_path, PathBuf::from(DEFAULT_CONFIG_PATH));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = Args::try_parse_from([
            "aruba-central",
            "config",
            "show",
            "-P",
            "Campus",
            "-c",
            "/etc/aruba",
        ])
        .unwrap();
        assert_eq!(args.profile, "Campus");
        assert_eq!(args.config_path, PathBuf::from("/etc/aruba"));
        assert!(matches!(
            args.command,
            Commands::Config {
                action: ConfigAction::Show { json: false }
            }
        ));
    }

    #[test]
    fn test_expand_home() {
        let home = std::env::var("HOME").unwrap();
        assert_eq!(
            expand_path(Path::new("~/aruba")),
            PathBuf::from(format!("{home}/aruba"))
        );
        assert_eq!(expand_path(Path::new("./config")), PathBuf::from("./config"));
    }
}
