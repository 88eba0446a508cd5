//! HTTP client for the Aruba Central API
//!
//! Every request asks the [`TokenManager`] for a token first and sends it as
//! `Authorization: Bearer {token}`. The manager answers from memory while
//! the token is valid, so this costs nothing on the common path.
//!
//! # Usage
//!
//! ```rust,no_run
//! use aruba_central_common::ProfileConfig;
//! use aruba_central_sdk::{ClientBuilder, ClientFilter};
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ProfileConfig::load("Default", Path::new("./config"))?;
//! let client = ClientBuilder::new().config(config).build()?;
//!
//! let clients = client.list_wireless_clients(&ClientFilter::default()).await?;
//! println!("{} clients", clients.len());
//! # Ok(())
//! # }
//! ```

use crate::{
    auth::{CentralOAuthProvider, TokenManager, TokenStore},
    error::{ApiError, Result},
    query::Query,
    types::{
        AccessPoint, ApQuery, ApSettings, ClientFilter, Network, Record, RenameOutcome, Swarm,
        value_to_string, WirelessClient, CLIENT_PAGE_SIZE,
    },
};
use aruba_central_common::ProfileConfig;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Default timeout in seconds for ordinary API requests
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default timeout in seconds for each page of the wireless client listing
pub const DEFAULT_CLIENT_LIST_TIMEOUT_SECS: u64 = 90;

/// HTTP client for interacting with the Aruba Central API
#[derive(Debug)]
pub struct ArubaCentralClient {
    http_client: reqwest::Client,
    base_url: String,
    token_manager: Arc<TokenManager>,
    timeout: Duration,
    client_list_timeout: Duration,
}

impl ArubaCentralClient {
    /// Create a new client (private - use ClientBuilder instead)
    fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        client_list_timeout: Duration,
        token_manager: Arc<TokenManager>,
    ) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiError::HttpClient)?;

        Ok(Self {
            http_client,
            base_url: base_url.into(),
            token_manager,
            timeout,
            client_list_timeout,
        })
    }

    /// Build a client with everything taken from the profile
    pub fn from_config(config: ProfileConfig) -> Result<Self> {
        ClientBuilder::new().config(config).build()
    }

    /// Token manager shared by every request of this client
    pub fn token_manager(&self) -> &Arc<TokenManager> {
        &self.token_manager
    }

    // ===== Access points =====

    /// List access points
    pub async fn get_aps(&self, query: &ApQuery) -> Result<Vec<AccessPoint>> {
        let swarm_id = self
            .resolve_swarm(query.swarm_id.as_deref(), query.vc.as_deref())
            .await?;

        let params = Query::new()
            .push_opt("limit", query.limit)
            .push_opt("status", query.status.as_deref())
            .push_opt("swarm_id", swarm_id)
            .push_opt("group", query.group.as_deref())
            .flag("calculate_client_count", query.calculate_client_count)
            .push_opt("label", query.label.as_deref());

        debug!("Listing APs with {:?}", params.pairs());
        let body: Value = self
            .authenticated_get("/monitoring/v1/aps", &params, self.timeout)
            .await?;
        take_records(body, "aps")
    }

    /// List access points whose status is `Down`
    pub async fn get_down_aps(&self, query: &ApQuery) -> Result<Vec<AccessPoint>> {
        let query = ApQuery {
            status: Some("Down".to_string()),
            ..query.clone()
        };
        self.get_aps(&query).await
    }

    /// Get one access point by serial number
    pub async fn get_ap(&self, serial: &str) -> Result<AccessPoint> {
        let path = format!("/monitoring/v1/aps/{}", serial_segment(serial)?);
        let body: Value = self
            .authenticated_get(&path, &Query::new(), self.timeout)
            .await?;
        into_record(body, &path)
    }

    // ===== Swarms and networks =====

    /// List swarms (virtual controllers)
    pub async fn get_vcs(&self, group: Option<&str>) -> Result<Vec<Swarm>> {
        let params = Query::new().push_opt("group", group);
        let body: Value = self
            .authenticated_get("/monitoring/v1/swarms", &params, self.timeout)
            .await?;
        take_records(body, "swarms")
    }

    /// Resolve a swarm name to its ID
    ///
    /// Matches case-insensitively on a substring of the name and returns the
    /// first hit in API order.
    pub async fn get_swarm_id(&self, name: &str) -> Result<String> {
        let needle = name.to_lowercase();
        let swarms = self.get_vcs(None).await?;

        swarms
            .iter()
            .find(|swarm| {
                swarm
                    .get("name")
                    .and_then(Value::as_str)
                    .is_some_and(|n| n.to_lowercase().contains(&needle))
            })
            .and_then(|swarm| swarm.get("swarm_id"))
            .and_then(value_to_string)
            .ok_or_else(|| ApiError::NotFound {
                resource: format!("swarm matching '{name}'"),
            })
    }

    /// List configured networks (SSIDs)
    pub async fn get_networks(&self, group: Option<&str>) -> Result<Vec<Network>> {
        let params = Query::new().push_opt("group", group);
        let body: Value = self
            .authenticated_get("/monitoring/v1/networks", &params, self.timeout)
            .await?;
        take_records(body, "networks")
    }

    // ===== Clients =====

    /// Count connected clients
    pub async fn get_client_count(&self, filter: &ClientFilter) -> Result<u64> {
        let swarm_id = self
            .resolve_swarm(filter.swarm_id.as_deref(), filter.vc.as_deref())
            .await?;

        let params = Query::new()
            .push_opt("swarm_id", swarm_id)
            .push_opt("group", filter.group.as_deref())
            .push_opt("label", filter.label.as_deref())
            .push_opt("network", filter.network.as_deref());

        let body: Value = self
            .authenticated_get("/monitoring/v1/clients/count", &params, self.timeout)
            .await?;
        take_count(&body)
    }

    /// Count wireless clients through the listing endpoint's total
    pub async fn count_wireless_clients(&self, filter: &ClientFilter) -> Result<u64> {
        let swarm_id = self
            .resolve_swarm(filter.swarm_id.as_deref(), filter.vc.as_deref())
            .await?;
        let params = wireless_query(filter, swarm_id.as_deref()).push("limit", CLIENT_PAGE_SIZE);

        let body: Value = self
            .authenticated_get(
                "/monitoring/v1/clients/wireless",
                &params,
                self.client_list_timeout,
            )
            .await?;
        take_count(&body)
    }

    /// List every wireless client, one page of [`CLIENT_PAGE_SIZE`] at a time
    ///
    /// Stops at the first page shorter than the page size.
    pub async fn list_wireless_clients(&self, filter: &ClientFilter) -> Result<Vec<WirelessClient>> {
        let swarm_id = self
            .resolve_swarm(filter.swarm_id.as_deref(), filter.vc.as_deref())
            .await?;

        let mut clients = Vec::new();
        let mut offset: u32 = 0;
        loop {
            let params = wireless_query(filter, swarm_id.as_deref())
                .push("limit", CLIENT_PAGE_SIZE)
                .push("offset", offset);

            let body: Value = self
                .authenticated_get(
                    "/monitoring/v1/clients/wireless",
                    &params,
                    self.client_list_timeout,
                )
                .await?;
            let page = take_records(body, "clients")?;
            let page_len = page.len();
            clients.extend(page);

            debug!("Fetched {} wireless clients at offset {}", page_len, offset);
            if page_len < CLIENT_PAGE_SIZE as usize {
                break;
            }
            offset += CLIENT_PAGE_SIZE;
        }

        Ok(clients)
    }

    // ===== Platform =====

    /// List user accounts of the customer
    pub async fn get_user_accounts(&self) -> Result<Value> {
        self.authenticated_get("/platform/rbac/v1/users", &Query::new(), self.timeout)
            .await
    }

    // ===== AP configuration =====

    /// Read an access point's settings
    pub async fn get_ap_settings(&self, serial: &str) -> Result<ApSettings> {
        let path = format!("/configuration/v1/ap_settings/{}", serial_segment(serial)?);
        let body: Value = self
            .authenticated_get(&path, &Query::new(), self.timeout)
            .await?;
        into_record(body, &path)
    }

    /// Replace an access point's settings
    pub async fn update_ap_settings(&self, serial: &str, settings: &ApSettings) -> Result<Value> {
        let path = format!("/configuration/v1/ap_settings/{}", serial_segment(serial)?);
        self.authenticated_post(&path, settings, self.timeout).await
    }

    /// Set an access point's hostname
    ///
    /// Nothing is posted when the AP already has that name.
    pub async fn rename_ap(&self, hostname: &str, serial: &str) -> Result<RenameOutcome> {
        let mut settings = self.get_ap_settings(serial).await?;

        if settings.get("hostname").and_then(Value::as_str) == Some(hostname) {
            debug!("AP {} already named {}", serial, hostname);
            return Ok(RenameOutcome::Unchanged);
        }

        settings.insert("hostname".to_string(), Value::String(hostname.to_string()));
        self.update_ap_settings(serial, &settings).await?;
        debug!("Renamed AP {} to {}", serial, hostname);
        Ok(RenameOutcome::Renamed)
    }

    // ===== Request layer =====

    /// Authenticated GET returning the decoded JSON body
    pub async fn authenticated_get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &Query,
        timeout: Duration,
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self
            .http_client
            .get(&url)
            .header(ACCEPT, "application/json")
            .timeout(timeout);
        if !query.is_empty() {
            request = request.query(query.pairs());
        }
        let request = self.apply_auth(request).await?;

        let response = request.send().await.map_err(ApiError::HttpClient)?;
        self.handle_response(response).await
    }

    /// Authenticated POST with a JSON body; an empty response body is `null`
    pub async fn authenticated_post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        timeout: Duration,
    ) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        let request = self
            .http_client
            .post(&url)
            .header(ACCEPT, "application/json")
            .timeout(timeout)
            .json(body);
        let request = self.apply_auth(request).await?;

        let response = request.send().await.map_err(ApiError::HttpClient)?;
        self.handle_response(response).await
    }

    /// Apply authentication to request
    async fn apply_auth(&self, request: RequestBuilder) -> Result<RequestBuilder> {
        let token = self.token_manager.access_token().await?;
        Ok(request.header(AUTHORIZATION, format!("Bearer {token}")))
    }

    async fn resolve_swarm(
        &self,
        swarm_id: Option<&str>,
        vc: Option<&str>,
    ) -> Result<Option<String>> {
        match (swarm_id, vc) {
            (Some(id), _) => Ok(Some(id.to_string())),
            (None, Some(name)) => Ok(Some(self.get_swarm_id(name).await?)),
            (None, None) => Ok(None),
        }
    }

    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> Result<T> {
        let status = response.status();
        let text = response.text().await.map_err(ApiError::HttpClient)?;

        if !status.is_success() {
            return Err(ApiError::RequestFailed {
                status: status.as_u16(),
                body: text,
            });
        }

        let value = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).map_err(|e| ApiError::InvalidResponse {
                message: format!("Response is not JSON: {e}"),
            })?
        };

        serde_json::from_value(value).map_err(|e| ApiError::InvalidResponse {
            message: format!("Unexpected response shape: {e}"),
        })
    }
}

fn wireless_query(filter: &ClientFilter, swarm_id: Option<&str>) -> Query {
    Query::new()
        .push_opt("swarm_id", swarm_id)
        .push_opt("group", filter.group.as_deref())
        .push_opt("label", filter.label.as_deref())
        .push_opt("network", filter.network.as_deref())
        .push_opt("band", filter.band.as_deref())
        .flag("calculate_total", true)
}

fn take_records(body: Value, key: &str) -> Result<Vec<Record>> {
    let Value::Object(mut envelope) = body else {
        return Err(missing_key(key));
    };
    let Some(Value::Array(items)) = envelope.remove(key) else {
        return Err(missing_key(key));
    };

    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(record) => Some(record),
            _ => None,
        })
        .collect())
}

fn take_count(body: &Value) -> Result<u64> {
    body.get("count")
        .and_then(Value::as_u64)
        .ok_or_else(|| missing_key("count"))
}

fn into_record(body: Value, path: &str) -> Result<Record> {
    match body {
        Value::Object(record) => Ok(record),
        _ => Err(ApiError::InvalidResponse {
            message: format!("Expected an object from {path}"),
        }),
    }
}

fn missing_key(key: &str) -> ApiError {
    ApiError::InvalidResponse {
        message: format!("Response has no '{key}' field"),
    }
}

/// Serial numbers become a URL path segment, so only plain identifiers pass
fn serial_segment(serial: &str) -> Result<&str> {
    let valid = !serial.is_empty()
        && serial
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(serial)
    } else {
        Err(ApiError::InvalidRequest {
            message: format!("Invalid serial number: {serial:?}"),
        })
    }
}

/// Builder for constructing an ArubaCentralClient
#[derive(Default)]
pub struct ClientBuilder {
    config: Option<ProfileConfig>,
    base_url: Option<String>,
    token_manager: Option<Arc<TokenManager>>,
    timeout: Option<Duration>,
    client_list_timeout: Option<Duration>,
}

impl ClientBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Take base URL, timeouts and credentials from a profile
    pub fn config(mut self, config: ProfileConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Override the base URL for the API
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Use an existing token manager instead of building one from the profile
    pub fn token_manager(mut self, manager: Arc<TokenManager>) -> Self {
        self.token_manager = Some(manager);
        self
    }

    /// Set the timeout for ordinary requests
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the per-page timeout of the wireless client listing
    pub fn client_list_timeout(mut self, timeout: Duration) -> Self {
        self.client_list_timeout = Some(timeout);
        self
    }

    /// Build the client
    pub fn build(self) -> Result<ArubaCentralClient> {
        let base_url = self
            .base_url
            .map(|url| url.trim_end_matches('/').to_string())
            .or_else(|| self.config.as_ref().map(|c| c.base_url().to_string()))
            .ok_or_else(|| ApiError::InvalidRequest {
                message: "Either config() or base_url() is required".into(),
            })?;

        let token_manager = match (self.token_manager, &self.config) {
            (Some(manager), _) => manager,
            (None, Some(config)) => {
                let provider = CentralOAuthProvider::new(config.clone())?;
                let storage = TokenStore::new(&config.config_path, &config.profile);
                Arc::new(TokenManager::new(Box::new(provider), storage))
            }
            (None, None) => {
                return Err(ApiError::InvalidRequest {
                    message: "Either config() or token_manager() is required".into(),
                })
            }
        };

        let timeout = self.timeout.unwrap_or_else(|| {
            Duration::from_secs(
                self.config
                    .as_ref()
                    .map_or(DEFAULT_TIMEOUT_SECS, |c| c.timeout_secs),
            )
        });
        let client_list_timeout = self.client_list_timeout.unwrap_or_else(|| {
            Duration::from_secs(
                self.config
                    .as_ref()
                    .map_or(DEFAULT_CLIENT_LIST_TIMEOUT_SECS, |c| c.client_list_timeout_secs),
            )
        });

        ArubaCentralClient::new(base_url, timeout, client_list_timeout, token_manager)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::types::now_epoch;
    use crate::auth::AccessToken;
    use serde_json::json;
    use std::collections::HashSet;
    use tempfile::TempDir;
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(url: &str, dir: &TempDir) -> ProfileConfig {
        ProfileConfig {
            profile: "Default".to_string(),
            url: url.to_string(),
            client_id: "client".to_string(),
            client_secret: "secret".to_string(),
            username: "user@example.edu".to_string(),
            password: "pw".to_string(),
            customer_id: "42".to_string(),
            timeout_secs: 10,
            client_list_timeout_secs: 90,
            config_path: dir.path().to_path_buf(),
        }
    }

    /// Client whose token store already holds a valid token, so no login runs
    async fn client(server: &MockServer) -> (ArubaCentralClient, TempDir) {
        let dir = TempDir::new().unwrap();
        let token = AccessToken {
            access_token: "test-token".to_string(),
            refresh_token: "refresh-token".to_string(),
            expires_in: 7200,
            expires_at: now_epoch() + 3600,
            token_type: Some("bearer".to_string()),
        };
        TokenStore::new(dir.path(), "Default")
            .save(&token)
            .await
            .unwrap();

        let client = ArubaCentralClient::from_config(config(&server.uri(), &dir)).unwrap();
        (client, dir)
    }

    fn client_page(start: usize, end: usize) -> Value {
        let clients: Vec<Value> = (start..end)
            .map(|i| json!({ "macaddr": format!("client-{i}"), "band": 5 }))
            .collect();
        json!({ "clients": clients, "count": 2437 })
    }

    #[tokio::test]
    async fn test_list_wireless_clients_pages_until_short_page() {
        let server = MockServer::start().await;
        for (offset, start, end) in [("0", 0, 1000), ("1000", 1000, 2000), ("2000", 2000, 2437)] {
            Mock::given(method("GET"))
                .and(path("/monitoring/v1/clients/wireless"))
                .and(query_param("limit", "1000"))
                .and(query_param("offset", offset))
                .and(header("Authorization", "Bearer test-token"))
                .respond_with(ResponseTemplate::new(200).set_body_json(client_page(start, end)))
                .expect(1)
                .mount(&server)
                .await;
        }

        let (client, _dir) = client(&server).await;
        let clients = client
            .list_wireless_clients(&ClientFilter::default())
            .await
            .unwrap();

        assert_eq!(clients.len(), 2437);
        let unique: HashSet<&str> = clients
            .iter()
            .filter_map(|c| c.get("macaddr").and_then(Value::as_str))
            .collect();
        assert_eq!(unique.len(), 2437);
    }

    #[tokio::test]
    async fn test_list_wireless_clients_exact_multiple_fetches_empty_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/monitoring/v1/clients/wireless"))
            .and(query_param("offset", "0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(client_page(0, 1000)))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/monitoring/v1/clients/wireless"))
            .and(query_param("offset", "1000"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "clients": [] })))
            .expect(1)
            .mount(&server)
            .await;

        let (client, _dir) = client(&server).await;
        let clients = client
            .list_wireless_clients(&ClientFilter::default())
            .await
            .unwrap();
        assert_eq!(clients.len(), 1000);
    }

    fn swarms() -> Value {
        json!({
            "swarms": [
                { "name": "Library-VC", "swarm_id": "lib-1" },
                { "name": "BRO-AP1", "swarm_id": "bro-1" },
                { "name": "BRO-AP2", "swarm_id": "bro-2" }
            ]
        })
    }

    #[tokio::test]
    async fn test_swarm_lookup_is_case_insensitive_substring() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/monitoring/v1/swarms"))
            .respond_with(ResponseTemplate::new(200).set_body_json(swarms()))
            .mount(&server)
            .await;

        let (client, _dir) = client(&server).await;
        assert_eq!(client.get_swarm_id("bro").await.unwrap(), "bro-1");
        assert_eq!(client.get_swarm_id("LIBRARY").await.unwrap(), "lib-1");

        let err = client.get_swarm_id("nomatch").await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_down_aps_resolve_vc_name() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/monitoring/v1/swarms"))
            .respond_with(ResponseTemplate::new(200).set_body_json(swarms()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/monitoring/v1/aps"))
            .and(query_param("status", "Down"))
            .and(query_param("swarm_id", "bro-1"))
            .and(query_param("limit", "100"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "aps": [{ "serial": "CNX1", "status": "Down" }],
                "count": 1
            })))
            .expect(1)
            .mount(&server)
            .await;

        let (client, _dir) = client(&server).await;
        let query = ApQuery {
            vc: Some("BRO".to_string()),
            ..ApQuery::default()
        };
        let down = client.get_down_aps(&query).await.unwrap();
        assert_eq!(down.len(), 1);
    }

    #[tokio::test]
    async fn test_client_count() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/monitoring/v1/clients/count"))
            .and(query_param("network", "Guest Wi-Fi"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "count": 17 })))
            .expect(1)
            .mount(&server)
            .await;

        let (client, _dir) = client(&server).await;
        let count = client
            .get_client_count(&ClientFilter::network("Guest Wi-Fi"))
            .await
            .unwrap();
        assert_eq!(count, 17);
    }

    #[tokio::test]
    async fn test_rename_posts_new_hostname() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/configuration/v1/ap_settings/CNX1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "hostname": "old-name",
                "ip_address": "0.0.0.0"
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/configuration/v1/ap_settings/CNX1"))
            .and(body_partial_json(json!({
                "hostname": "RICK-e-101",
                "ip_address": "0.0.0.0"
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let (client, _dir) = client(&server).await;
        let outcome = client.rename_ap("RICK-e-101", "CNX1").await.unwrap();
        assert_eq!(outcome, RenameOutcome::Renamed);
    }

    #[tokio::test]
    async fn test_rename_is_noop_when_name_matches() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/configuration/v1/ap_settings/CNX1"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "hostname": "RICK-e-101" })),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/configuration/v1/ap_settings/CNX1"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let (client, _dir) = client(&server).await;
        let outcome = client.rename_ap("RICK-e-101", "CNX1").await.unwrap();
        assert_eq!(outcome, RenameOutcome::Unchanged);
    }

    #[tokio::test]
    async fn test_rename_rejects_serial_with_path_characters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "hostname": "x" })))
            .expect(0)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let (client, _dir) = client(&server).await;
        for serial in ["../aps", "CNX1/x", "CNX1?q=1", ""] {
            let err = client.rename_ap("RICK-e-101", serial).await.unwrap_err();
            assert!(matches!(err, ApiError::InvalidRequest { .. }), "{serial}");
        }
        assert!(matches!(
            client.get_ap("CNX1/../..").await.unwrap_err(),
            ApiError::InvalidRequest { .. }
        ));
    }

    #[test]
    fn test_serial_segment_accepts_plain_serials() {
        assert_eq!(serial_segment("CNX1AB-9_z").unwrap(), "CNX1AB-9_z");
    }

    #[tokio::test]
    async fn test_non_success_is_request_failed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/monitoring/v1/networks"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream timeout"))
            .mount(&server)
            .await;

        let (client, _dir) = client(&server).await;
        let err = client.get_networks(None).await.unwrap_err();
        match err {
            ApiError::RequestFailed { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "upstream timeout");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_envelope_key_is_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/monitoring/v1/swarms"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "total": 0 })))
            .mount(&server)
            .await;

        let (client, _dir) = client(&server).await;
        let err = client.get_vcs(None).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse { .. }));
    }

    #[test]
    fn test_builder_requires_config_or_manager() {
        let err = ClientBuilder::new()
            .base_url("https://example.com")
            .build()
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidRequest { .. }));
    }
}
