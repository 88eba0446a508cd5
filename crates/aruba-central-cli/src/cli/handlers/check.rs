//! Nagios check for down APs in a VC cluster or group
//!
//! Prints exactly one status line with perfdata and exits with the Nagios
//! code. Every failure, including a broken configuration, is reported as
//! UNKNOWN rather than as an error.

use crate::cli::commands::CheckOptions;
use crate::error::Result;
use aruba_central_common::ProfileConfig;
use aruba_central_sdk::{ApQuery, ApiError, ArubaCentralClient};
use std::path::Path;
use std::process::ExitCode;
use tracing::debug;

/// Page size when counting every AP of a cluster
const TOTAL_AP_LIMIT: u32 = 1000;

/// Nagios plugin states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Critical,
    Unknown,
}

impl CheckStatus {
    pub fn code(self) -> u8 {
        match self {
            CheckStatus::Ok => 0,
            CheckStatus::Warning => 1,
            CheckStatus::Critical => 2,
            CheckStatus::Unknown => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CheckStatus::Ok => "OK",
            CheckStatus::Warning => "WARNING",
            CheckStatus::Critical => "CRITICAL",
            CheckStatus::Unknown => "UNKNOWN",
        }
    }
}

/// Status plus the line printed for Nagios
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    pub status: CheckStatus,
    pub message: String,
}

impl CheckOutcome {
    fn new(status: CheckStatus, detail: impl std::fmt::Display) -> Self {
        Self {
            status,
            message: format!("{} - {}", status.label(), detail),
        }
    }

    fn unknown(detail: impl std::fmt::Display) -> Self {
        Self::new(CheckStatus::Unknown, detail)
    }
}

/// Name used in the status line
pub fn display_name(options: &CheckOptions) -> String {
    if let Some(group) = &options.group {
        return group.clone();
    }
    match (&options.name, &options.vc, &options.swarm_id) {
        (Some(name), _, _) => format!("VC {name}"),
        (None, Some(vc), _) => format!("VC {vc}"),
        (None, None, Some(id)) => format!("Swarm with ID: {id}"),
        (None, None, None) => "all APs".to_string(),
    }
}

/// Decide the state from the down count and, when requested, the total
///
/// `total` is the number of APs found; it is only consulted when an expected
/// total was configured and the down count is below both thresholds.
pub fn evaluate(
    name: &str,
    down: usize,
    total: Option<usize>,
    options: &CheckOptions,
) -> CheckOutcome {
    if down >= options.crit {
        return CheckOutcome::new(
            CheckStatus::Critical,
            format!("{down} APs are down in {name} | 'down_aps'={down}"),
        );
    }
    if down >= options.warn {
        return CheckOutcome::new(
            CheckStatus::Warning,
            format!("{down} APs are down in {name} | 'down_aps'={down}"),
        );
    }

    match (options.total, total) {
        (Some(expected), Some(found)) if found < expected => CheckOutcome::unknown(format!(
            "Not enough APs in {name}. Expected {expected}, got {found} | 'aps'={found}"
        )),
        (Some(_), Some(found)) => CheckOutcome::new(
            CheckStatus::Ok,
            format!("{found} APs are up in {name} | 'aps'={found}"),
        ),
        _ => CheckOutcome::new(
            CheckStatus::Ok,
            format!("{down} APs are down in {name} | 'down_aps'={down}"),
        ),
    }
}

/// Run the check against the API
pub async fn run_check(client: &ArubaCentralClient, options: &CheckOptions) -> CheckOutcome {
    let swarm_id = match (&options.swarm_id, &options.vc) {
        (Some(id), _) => Some(id.clone()),
        (None, Some(vc)) => match client.get_swarm_id(vc).await {
            Ok(id) => Some(id),
            Err(ApiError::NotFound { .. }) => {
                return CheckOutcome::unknown(format!("VC {vc} not found."))
            }
            Err(e) => return CheckOutcome::unknown(e),
        },
        (None, None) => None,
    };

    let name = display_name(options);
    let query = ApQuery {
        swarm_id,
        group: options.group.clone(),
        ..ApQuery::default()
    };

    let down = match client.get_down_aps(&query).await {
        Ok(aps) => aps.len(),
        Err(e) => return CheckOutcome::unknown(e),
    };
    debug!("{} APs down in {}", down, name);

    let total = if options.total.is_some() && down < options.warn && down < options.crit {
        let all = ApQuery {
            limit: Some(TOTAL_AP_LIMIT),
            ..query
        };
        match client.get_aps(&all).await {
            Ok(aps) => Some(aps.len()),
            Err(e) => return CheckOutcome::unknown(e),
        }
    } else {
        None
    };

    evaluate(&name, down, total, options)
}

/// Handle the `check-vc` command
pub async fn handle_check_vc(
    profile: &str,
    config_path: &Path,
    options: CheckOptions,
) -> Result<ExitCode> {
    let outcome = match ProfileConfig::load(profile, config_path) {
        Ok(config) => match ArubaCentralClient::from_config(config) {
            Ok(client) => run_check(&client, &options).await,
            Err(e) => CheckOutcome::unknown(e),
        },
        Err(e) => CheckOutcome::unknown(e),
    };

    println!("{}", outcome.message);
    Ok(ExitCode::from(outcome.status.code()))
}
