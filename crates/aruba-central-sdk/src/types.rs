//! Type definitions for the Aruba Central SDK
//!
//! Monitoring records are passed through as JSON objects. Callers read the
//! fields they need; the SDK only checks the envelope keys.

use serde_json::Value;

/// A JSON object as returned by the API
pub type Record = serde_json::Map<String, Value>;

/// Access point record from `/monitoring/v1/aps`
pub type AccessPoint = Record;

/// Swarm (virtual controller) record from `/monitoring/v1/swarms`
pub type Swarm = Record;

/// Network (SSID) record from `/monitoring/v1/networks`
pub type Network = Record;

/// Wireless client record from `/monitoring/v1/clients/wireless`
pub type WirelessClient = Record;

/// AP configuration from `/configuration/v1/ap_settings/{serial}`
pub type ApSettings = Record;

/// Page size of the wireless client listing; the API refuses larger pages
pub const CLIENT_PAGE_SIZE: u32 = 1000;

/// Default `limit` for AP listings
pub const DEFAULT_AP_LIMIT: u32 = 100;

/// Read an ID field that may arrive as a string or a number
pub fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Filters for AP listings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApQuery {
    pub limit: Option<u32>,
    pub status: Option<String>,
    /// Takes precedence over `vc`
    pub swarm_id: Option<String>,
    /// Swarm name, resolved to an ID with a substring lookup
    pub vc: Option<String>,
    pub group: Option<String>,
    pub calculate_client_count: bool,
    pub label: Option<String>,
}

impl Default for ApQuery {
    fn default() -> Self {
        Self {
            limit: Some(DEFAULT_AP_LIMIT),
            status: None,
            swarm_id: None,
            vc: None,
            group: None,
            calculate_client_count: false,
            label: None,
        }
    }
}

/// Filters for client counts and listings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientFilter {
    /// Takes precedence over `vc`
    pub swarm_id: Option<String>,
    pub vc: Option<String>,
    pub group: Option<String>,
    pub label: Option<String>,
    pub network: Option<String>,
    pub band: Option<String>,
}

impl ClientFilter {
    pub fn group(group: Option<String>) -> Self {
        Self {
            group,
            ..Self::default()
        }
    }

    pub fn swarm(swarm_id: impl Into<String>) -> Self {
        Self {
            swarm_id: Some(swarm_id.into()),
            ..Self::default()
        }
    }

    pub fn network(network: impl Into<String>) -> Self {
        Self {
            network: Some(network.into()),
            ..Self::default()
        }
    }
}

/// Result of [`crate::ArubaCentralClient::rename_ap`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameOutcome {
    /// The AP already carried the requested name
    Unchanged,
    /// Settings were posted with the new name
    Renamed,
}
