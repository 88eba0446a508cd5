//! collectd exec plugin output
//!
//! Each gauge becomes one line:
//!
//! ```text
//! PUTVAL "<host>/exec-<key>/gauge-arubatotal" interval=<secs> N:<value>
//! ```
//!
//! Keys built from SSID, VC or OS names are reduced to `[A-Za-z0-9_.-]`.

use std::io::Write;

/// One named value to report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gauge {
    pub key: String,
    pub value: u64,
}

impl Gauge {
    pub fn new(key: impl Into<String>, value: u64) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Drop every character collectd cannot take in a plugin instance
pub fn sanitize_key(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect()
}

/// Format one PUTVAL line (without newline)
pub fn format_putval(host: &str, key: &str, interval: u64, value: u64) -> String {
    format!(
        "PUTVAL \"{host}/exec-{}/gauge-arubatotal\" interval={interval} N:{value}",
        sanitize_key(key)
    )
}

/// Write all gauges and flush; collectd reads the pipe line by line
pub fn write_gauges<W: Write>(
    out: &mut W,
    host: &str,
    interval: u64,
    gauges: &[Gauge],
) -> std::io::Result<()> {
    for gauge in gauges {
        writeln!(out, "{}", format_putval(host, &gauge.key, interval, gauge.value))?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_putval() {
        assert_eq!(
            format_putval("localhost", "client_aruba_all", 60, 2437),
            "PUTVAL \"localhost/exec-client_aruba_all/gauge-arubatotal\" interval=60 N:2437"
        );
    }

    #[test]
    fn test_sanitize_removes_spaces_and_slashes() {
        assert_eq!(sanitize_key("client_os_aruba_Mac OS/iOS"), "client_os_aruba_MacOSiOS");
        assert_eq!(sanitize_key("ssid_aruba_Guest Wi-Fi"), "ssid_aruba_GuestWi-Fi");
        assert_eq!(sanitize_key("vc_aruba_BRO.2 (east)"), "vc_aruba_BRO.2east");
        assert_eq!(sanitize_key("ssid_aruba_\"quoted\""), "ssid_aruba_quoted");
    }

    #[test]
    fn test_write_gauges() {
        let mut out = Vec::new();
        let gauges = vec![
            Gauge::new("ssid_aruba_Guest Wi-Fi", 12),
            Gauge::new("ssid_aruba_eduroam", 340),
        ];
        write_gauges(&mut out, "netgraphs", 5, &gauges).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "PUTVAL \"netgraphs/exec-ssid_aruba_GuestWi-Fi/gauge-arubatotal\" interval=5 N:12\n\
             PUTVAL \"netgraphs/exec-ssid_aruba_eduroam/gauge-arubatotal\" interval=5 N:340\n"
        );
    }
}
