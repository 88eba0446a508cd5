//! collectd exec pollers
//!
//! Each poller runs forever (unless `--once`), printing PUTVAL lines on
//! every tick. Ticks run one after another on a `tokio::time::interval`; a
//! slow tick delays the next one instead of overlapping it. A failed tick is
//! logged and the next one tries again, while a failure to fetch the SSID or
//! VC list at startup ends the process.

use crate::cli::commands::PollOptions;
use crate::error::Result;
use crate::output::putval::{write_gauges, Gauge};
use aruba_central_common::ProfileConfig;
use aruba_central_sdk::{value_to_string, ArubaCentralClient, ClientFilter, WirelessClient};
use serde_json::Value;
use std::collections::BTreeMap;
use std::future::Future;
use std::process::ExitCode;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

/// Clients below this health score count as sick
pub const SICK_HEALTH_THRESHOLD: f64 = 75.0;

/// OS type the API reports for unidentified clients
const UNKNOWN_OS: &str = "--";

/// Counters derived from one wireless client listing
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ClientStats {
    pub total: u64,
    pub sick: u64,
    pub band_5: u64,
    pub band_2_4: u64,
    pub os: BTreeMap<String, u64>,
    pub connection: BTreeMap<String, u64>,
}

impl ClientStats {
    pub fn from_clients(clients: &[WirelessClient]) -> Self {
        let mut stats = Self::default();
        for client in clients {
            stats.add(client);
        }
        stats
    }

    fn add(&mut self, client: &WirelessClient) {
        self.total += 1;

        if is_5ghz(client.get("band")) {
            self.band_5 += 1;
        } else {
            self.band_2_4 += 1;
        }

        if client
            .get("health")
            .and_then(Value::as_f64)
            .is_some_and(|health| health < SICK_HEALTH_THRESHOLD)
        {
            self.sick += 1;
        }

        if let Some(os) = client.get("os_type").and_then(Value::as_str) {
            *self.os.entry(os.to_string()).or_default() += 1;
        }

        // e.g. "802.11ac, 802.11r"
        if let Some(connection) = client.get("connection").and_then(Value::as_str) {
            for kind in connection.split(", ").filter(|kind| !kind.is_empty()) {
                *self.connection.entry(kind.to_string()).or_default() += 1;
            }
        }
    }

    /// Gauges in output order: totals, bands, OS types, connection kinds
    pub fn gauges(&self) -> Vec<Gauge> {
        let mut gauges = vec![
            Gauge::new("client_aruba_all", self.total),
            Gauge::new("client_aruba_sick", self.sick),
            Gauge::new("client_aruba_band_5", self.band_5),
            Gauge::new("client_aruba_band_2_4", self.band_2_4),
        ];
        gauges.extend(
            self.os
                .iter()
                .filter(|(os, _)| os.as_str() != UNKNOWN_OS)
                .map(|(os, count)| Gauge::new(format!("client_os_aruba_{os}"), *count)),
        );
        gauges.extend(
            self.connection
                .iter()
                .map(|(kind, count)| Gauge::new(format!("client_connection_aruba_{kind}"), *count)),
        );
        gauges
    }
}

fn is_5ghz(band: Option<&Value>) -> bool {
    match band {
        Some(Value::Number(n)) => n.as_f64() == Some(5.0),
        Some(Value::String(s)) => s.trim() == "5",
        _ => false,
    }
}

/// One VC to poll, keyed by the name shown in its metric
#[derive(Debug, Clone)]
pub struct VcTarget {
    pub name: String,
    pub filter: ClientFilter,
}

impl VcTarget {
    /// Prefer the swarm ID; fall back to the name lookup when it is missing
    fn from_swarm(swarm: &aruba_central_sdk::Swarm) -> Option<Self> {
        let name = swarm.get("name").and_then(Value::as_str)?.to_string();
        let filter = match swarm.get("swarm_id").and_then(value_to_string) {
            Some(id) => ClientFilter::swarm(id),
            None => ClientFilter {
                vc: Some(name.clone()),
                ..ClientFilter::default()
            },
        };
        Some(Self { name, filter })
    }
}

/// Gauges for the `clients` poller
pub async fn client_gauges(
    client: &ArubaCentralClient,
    filter: &ClientFilter,
) -> aruba_central_sdk::Result<Vec<Gauge>> {
    let clients = client.list_wireless_clients(filter).await?;
    debug!("Fetched {} wireless clients", clients.len());
    Ok(ClientStats::from_clients(&clients).gauges())
}

/// Gauges for the `ssids` poller
pub async fn ssid_gauges(
    client: &ArubaCentralClient,
    essids: &[String],
) -> aruba_central_sdk::Result<Vec<Gauge>> {
    let mut gauges = Vec::with_capacity(essids.len());
    for essid in essids {
        let count = client
            .count_wireless_clients(&ClientFilter::network(essid.as_str()))
            .await?;
        gauges.push(Gauge::new(format!("ssid_aruba_{essid}"), count));
    }
    Ok(gauges)
}

/// Gauges for the `vcs` poller
pub async fn vc_gauges(
    client: &ArubaCentralClient,
    targets: &[VcTarget],
) -> aruba_central_sdk::Result<Vec<Gauge>> {
    let mut gauges = Vec::with_capacity(targets.len());
    for target in targets {
        let count = client.count_wireless_clients(&target.filter).await?;
        gauges.push(Gauge::new(format!("vc_aruba_{}", target.name), count));
    }
    Ok(gauges)
}

/// Handle the `clients` poller
pub async fn handle_clients(
    config: ProfileConfig,
    group: Option<String>,
    poll: PollOptions,
) -> Result<ExitCode> {
    let client = ArubaCentralClient::from_config(config)?;
    let filter = ClientFilter::group(group);

    let (client, filter) = (&client, &filter);
    run_poller(&poll, move || client_gauges(client, filter)).await
}

/// Handle the `ssids` poller
pub async fn handle_ssids(config: ProfileConfig, poll: PollOptions) -> Result<ExitCode> {
    let client = ArubaCentralClient::from_config(config)?;

    let essids: Vec<String> = client
        .get_networks(None)
        .await?
        .iter()
        .filter_map(|network| network.get("essid").and_then(Value::as_str))
        .map(str::to_string)
        .collect();
    info!("Polling client counts for {} SSIDs", essids.len());

    let (client, essids) = (&client, &essids);
    run_poller(&poll, move || ssid_gauges(client, essids)).await
}

/// Handle the `vcs` poller
pub async fn handle_vcs(
    config: ProfileConfig,
    group: Option<String>,
    poll: PollOptions,
) -> Result<ExitCode> {
    let client = ArubaCentralClient::from_config(config)?;

    let targets: Vec<VcTarget> = client
        .get_vcs(group.as_deref())
        .await?
        .iter()
        .filter_map(VcTarget::from_swarm)
        .collect();
    info!("Polling client counts for {} VCs", targets.len());

    let (client, targets) = (&client, &targets);
    run_poller(&poll, move || vc_gauges(client, targets)).await
}

/// Run `tick` every interval and print its gauges
///
/// With `--once` the first tick's error is returned instead of logged.
pub async fn run_poller<F, Fut>(poll: &PollOptions, mut tick: F) -> Result<ExitCode>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = aruba_central_sdk::Result<Vec<Gauge>>>,
{
    let interval = poll.interval_secs();
    let mut ticker = tokio::time::interval(Duration::from_secs(interval));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    info!("Polling every {}s as {}", interval, poll.hostname);

    loop {
        ticker.tick().await;

        match tick().await {
            Ok(gauges) => {
                let mut stdout = std::io::stdout().lock();
                write_gauges(&mut stdout, &poll.hostname, interval, &gauges)?;
            }
            Err(e) if poll.once => return Err(e.into()),
            Err(e) if e.is_transient() => warn!("Poll failed, retrying in {}s: {}", interval, e),
            Err(e) => error!("Poll failed, retrying in {}s: {}", interval, e),
        }

        if poll.once {
            return Ok(ExitCode::SUCCESS);
        }
    }
}
