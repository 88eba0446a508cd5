use clap::{ArgGroup, Args, Subcommand};
use std::path::PathBuf;

/// Main CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// collectd poller: wireless client totals, health, band, OS and connection type
    Clients {
        /// Only count clients in this group
        #[arg(short, long)]
        group: Option<String>,

        #[command(flatten)]
        poll: PollOptions,
    },

    /// collectd poller: client count per SSID
    Ssids {
        #[command(flatten)]
        poll: PollOptions,
    },

    /// collectd poller: client count per virtual controller
    Vcs {
        /// Only poll VCs in this group
        #[arg(short, long)]
        group: Option<String>,

        #[command(flatten)]
        poll: PollOptions,
    },

    /// Nagios check: down APs in a virtual controller cluster or group
    CheckVc {
        #[command(flatten)]
        options: CheckOptions,
    },

    /// Set AP hostnames from a CSV with "AP Name" and "Serial Number" columns
    RenameAps {
        /// CSV file to read
        csv: PathBuf,

        /// Only rename APs whose name contains this text
        #[arg(long)]
        filter: Option<String>,
    },

    /// Log in with the profile's credentials, replacing any cached token
    Login,

    /// Delete the profile's cached token
    Logout,

    /// Show the cached token's state and expiry
    Token,

    /// Inspect the profile configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Options shared by the collectd pollers
#[derive(Args, Debug, Clone)]
pub struct PollOptions {
    /// Host name used in PUTVAL identifiers
    #[arg(long, env = "COLLECTD_HOSTNAME", default_value = "localhost")]
    pub hostname: String,

    /// Seconds between polls (collectd passes fractional values)
    #[arg(long, env = "COLLECTD_INTERVAL", default_value_t = 60.0)]
    pub interval: f64,

    /// Poll every 5 seconds
    #[arg(long)]
    pub debug: bool,

    /// Poll once and exit
    #[arg(long)]
    pub once: bool,
}

impl PollOptions {
    /// Effective interval in whole seconds
    pub fn interval_secs(&self) -> u64 {
        if self.debug {
            5
        } else {
            (self.interval.round() as u64).max(1)
        }
    }
}

/// Options of the Nagios VC check
#[derive(Args, Debug, Clone)]
#[command(group(
    ArgGroup::new("target")
        .required(true)
        .multiple(true)
        .args(["vc", "swarm_id", "group"])
))]
pub struct CheckOptions {
    /// Name (or part of the name) of the cluster to check
    #[arg(short = 'V', long)]
    pub vc: Option<String>,

    /// Swarm ID of the cluster to check
    #[arg(short = 'S', long)]
    pub swarm_id: Option<String>,

    /// Display name for the cluster given with --swarm-id or --vc
    #[arg(short = 'N', long)]
    pub name: Option<String>,

    /// Configuration group to check
    #[arg(short = 'G', long)]
    pub group: Option<String>,

    /// Warning threshold for the number of down APs
    #[arg(short = 'W', long, default_value_t = 1)]
    pub warn: usize,

    /// Critical threshold for the number of down APs
    #[arg(short = 'C', long, default_value_t = 5)]
    pub crit: usize,

    /// Expected total number of APs
    #[arg(short = 'T', long)]
    pub total: Option<usize>,
}

/// Configuration actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the merged profile with secrets redacted
    Show {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Args as CliArgs;
    use clap::Parser;

    fn poll(interval: f64, debug: bool) -> PollOptions {
        PollOptions {
            hostname: "localhost".to_string(),
            interval,
            debug,
            once: false,
        }
    }

    #[test]
    fn test_interval_secs() {
        assert_eq!(poll(60.0, false).interval_secs(), 60);
        assert_eq!(poll(10.000, false).interval_secs(), 10);
        assert_eq!(poll(0.2, false).interval_secs(), 1);
        assert_eq!(poll(60.0, true).interval_secs(), 5);
    }

    #[test]
    fn test_check_vc_short_flags() {
        let args = CliArgs::try_parse_from([
            "aruba-central",
            "check-vc",
            "-V",
            "BRO",
            "-W",
            "2",
            "-C",
            "4",
            "-T",
            "30",
        ])
        .unwrap();

        let Commands::CheckVc { options } = args.command else {
            panic!("expected check-vc");
        };
        assert_eq!(options.vc.as_deref(), Some("BRO"));
        assert_eq!(options.warn, 2);
        assert_eq!(options.crit, 4);
        assert_eq!(options.total, Some(30));
    }

    #[test]
    fn test_check_vc_requires_a_target() {
        let result = CliArgs::try_parse_from(["aruba-central", "check-vc", "-W", "2"]);
        assert!(result.is_err());
    }
}
