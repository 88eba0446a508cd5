//! Profile configuration
//!
//! A config directory holds three YAML files:
//!
//! - `config.yml`: profile name -> `{user_account, region, ...overrides}`
//! - `accounts.yml`: account name -> `{username, password, client_id, client_secret, customer_id}`
//! - `regions.yml`: region name -> `{url}`
//!
//! [`ProfileConfig::load`] merges the profile entry, the account it names,
//! the region URL and the profile/config path into one immutable value, then
//! applies `ARUBA_CENTRAL_*` environment overrides.

use crate::error::ConfigurationError;
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    value::Dict,
    Figment,
};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Config directory used when none is given
pub const DEFAULT_CONFIG_PATH: &str = "./config";

/// Profile used when none is given
pub const DEFAULT_PROFILE: &str = "Default";

/// Prefix for environment overrides of profile settings
pub const ENV_PREFIX: &str = "ARUBA_CENTRAL_";

const CONFIG_FILE: &str = "config.yml";
const ACCOUNTS_FILE: &str = "accounts.yml";
const REGIONS_FILE: &str = "regions.yml";

const REDACTED: &str = "********";

/// Environment overrides taken verbatim, never parsed as numbers or booleans.
const ENV_STRING_KEYS: &[&str] = &[
    "url",
    "client_id",
    "client_secret",
    "username",
    "password",
    "customer_id",
];

/// Environment overrides parsed as typed values.
const ENV_NUMERIC_KEYS: &[&str] = &["timeout_secs", "client_list_timeout_secs"];

fn default_timeout_secs() -> u64 {
    10
}

fn default_client_list_timeout_secs() -> u64 {
    90
}

/// Fully merged settings for one Aruba Central profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileConfig {
    /// Profile name, also used to name the token file
    pub profile: String,

    /// API gateway base URL for the profile's region
    pub url: String,

    /// API gateway client ID
    #[serde(deserialize_with = "lenient_string")]
    pub client_id: String,

    /// API gateway client secret
    #[serde(deserialize_with = "lenient_string")]
    pub client_secret: String,

    /// Central user name
    #[serde(deserialize_with = "lenient_string")]
    pub username: String,

    /// Central password
    #[serde(deserialize_with = "lenient_string")]
    pub password: String,

    /// Central customer ID
    #[serde(deserialize_with = "lenient_string")]
    pub customer_id: String,

    /// Timeout for authentication and ordinary API calls, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Timeout for each page of the wireless client listing, in seconds
    #[serde(default = "default_client_list_timeout_secs")]
    pub client_list_timeout_secs: u64,

    /// Directory the profile was loaded from; tokens live underneath it
    pub config_path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct ProfileEntry {
    user_account: String,
    region: String,
    #[serde(flatten)]
    settings: Dict,
}

#[derive(Debug, Deserialize)]
struct RegionEntry {
    url: String,
}

impl ProfileConfig {
    /// Load and merge the named profile from `config_path`
    pub fn load(profile: &str, config_path: &Path) -> Result<Self, ConfigurationError> {
        debug!(
            "Loading profile {} from {}",
            profile,
            config_path.display()
        );

        let config_file = config_path.join(CONFIG_FILE);
        let mut profiles: HashMap<String, ProfileEntry> = read_yaml(&config_file)?;
        let entry = profiles
            .remove(profile)
            .ok_or_else(|| ConfigurationError::ProfileNotFound {
                profile: profile.to_string(),
                path: config_file.clone(),
            })?;

        let mut accounts: HashMap<String, Dict> = read_yaml(&config_path.join(ACCOUNTS_FILE))?;
        let account = accounts.remove(&entry.user_account).ok_or_else(|| {
            ConfigurationError::AccountNotFound {
                profile: profile.to_string(),
                account: entry.user_account.clone(),
            }
        })?;

        let mut regions: HashMap<String, RegionEntry> = read_yaml(&config_path.join(REGIONS_FILE))?;
        let region = regions
            .remove(&entry.region)
            .ok_or_else(|| ConfigurationError::RegionNotFound {
                profile: profile.to_string(),
                region: entry.region.clone(),
            })?;

        let mut figment = Figment::new()
            .merge(Serialized::defaults(entry.settings))
            .merge(Serialized::defaults(account))
            .merge(Serialized::default("url", region.url))
            .merge(Serialized::default("profile", profile))
            .merge(Serialized::default("config_path", config_path))
            .merge(Env::prefixed(ENV_PREFIX).only(ENV_NUMERIC_KEYS));

        for (key, raw) in Env::prefixed(ENV_PREFIX).only(ENV_STRING_KEYS).iter() {
            let key = key.as_str().to_ascii_lowercase();
            debug!("Overriding {} from the environment", key);
            figment = figment.merge(Serialized::default(&key, raw));
        }

        let config: Self = figment.extract()?;

        debug!("Loaded profile {} for {}", config.profile, config.url);
        Ok(config)
    }

    /// Copy of the configuration with secrets masked, for display
    pub fn redacted(&self) -> Self {
        Self {
            client_secret: REDACTED.to_string(),
            password: REDACTED.to_string(),
            ..self.clone()
        }
    }

    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }
}

fn read_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigurationError> {
    if !path.is_file() {
        return Err(ConfigurationError::MissingFile {
            path: path.to_path_buf(),
        });
    }
    Ok(Figment::from(Yaml::file(path)).extract()?)
}

/// Accept YAML strings and numbers alike; customer IDs are often numeric.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Lenient {
        Text(String),
        Unsigned(u64),
        Signed(i64),
    }

    Ok(match Lenient::deserialize(deserializer)? {
        Lenient::Text(s) => s,
        Lenient::Unsigned(n) => n.to_string(),
        Lenient::Signed(n) => n.to_string(),
    })
}
