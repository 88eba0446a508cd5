//! Token maintenance command handlers

use crate::error::Result;
use crate::output::{compress_path, print_field, print_info, print_success};
use aruba_central_common::ProfileConfig;
use aruba_central_sdk::auth::types::now_epoch;
use aruba_central_sdk::auth::CentralOAuthProvider;
use aruba_central_sdk::{AccessToken, TokenManager, TokenState, TokenStore};
use console::style;
use std::path::Path;
use std::process::ExitCode;
use tracing::debug;

/// Handle `login`: always runs the full three-step login
pub async fn handle_login(config: ProfileConfig) -> Result<ExitCode> {
    let provider = CentralOAuthProvider::new(config.clone())?;
    let manager = TokenManager::new(
        Box::new(provider),
        TokenStore::new(&config.config_path, &config.profile),
    );

    debug!("Logging in to {} for profile {}", config.base_url(), config.profile);
    let token = manager.login().await?;

    print_success(&format!(
        "Logged in to {} with profile {}",
        config.base_url(),
        style(&config.profile).bold()
    ));
    print_field("Token file", compress_path(manager.storage().path()));
    print_field("Expires", describe_expiry(&token, now_epoch()));
    Ok(ExitCode::SUCCESS)
}

/// Handle `logout`: works without credentials, only the path is needed
pub async fn handle_logout(profile: &str, config_path: &Path) -> Result<ExitCode> {
    let store = TokenStore::new(config_path, profile);
    store.delete().await?;

    print_success(&format!(
        "Removed cached token for profile {}",
        style(profile).bold()
    ));
    Ok(ExitCode::SUCCESS)
}

/// Handle `token`: show state and expiry of the cached token, never its value
pub async fn handle_token(profile: &str, config_path: &Path) -> Result<ExitCode> {
    let store = TokenStore::new(config_path, profile);

    let Some(token) = store.load().await? else {
        print_info(&format!(
            "No cached token for profile {} at {}",
            style(profile).bold(),
            compress_path(store.path())
        ));
        return Ok(ExitCode::SUCCESS);
    };

    let now = now_epoch();
    let state = token_state(&token, now);
    let styled_state = match state {
        TokenState::Expired => style(state.to_string()).yellow(),
        _ => style(state.to_string()).green(),
    };

    println!("Token for profile {}", style(profile).bold());
    print_field("State", styled_state);
    print_field("Expires", describe_expiry(&token, now));
    print_field(
        "Type",
        token.token_type.as_deref().unwrap_or("bearer"),
    );
    print_field("File", compress_path(store.path()));
    Ok(ExitCode::SUCCESS)
}

/// State of a token read from disk
pub fn token_state(token: &AccessToken, now: i64) -> TokenState {
    if token.is_expired_at(now) {
        TokenState::Expired
    } else {
        TokenState::Valid
    }
}

/// "2024-05-01T12:00:00+00:00 (in 1h 5m)" or "... (3m ago)"
pub fn describe_expiry(token: &AccessToken, now: i64) -> String {
    let at = token
        .expires_at_utc()
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| token.expires_at.to_string());
    let remaining = token.expires_at - now;

    if remaining >= 0 {
        format!("{at} (in {})", format_duration(remaining))
    } else {
        format!("{at} ({} ago)", format_duration(-remaining))
    }
}

fn format_duration(secs: i64) -> String {
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    match (hours, minutes) {
        (0, 0) => format!("{secs}s"),
        (0, m) => format!("{m}m"),
        (h, m) => format!("{h}h {m}m"),
    }
}
