//! Venue configuration
//!
//! Listening port, instrument list, and both feed streams come from a
//! JSON file; every field has a default suitable for a local run.

use std::net::{SocketAddr, SocketAddrV4};
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use feed::{FeedConfig, SessionName};
use serde::Deserialize;
use types::ids::Instrument;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Order-entry TCP listen address.
    pub listen_addr: SocketAddr,
    /// Tradable instrument identifiers.
    pub instruments: Vec<u32>,
    pub market_data: FeedSection,
    pub trade_reports: FeedSection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeedSection {
    /// Stream name carried in every packet header (at most 8 ASCII chars).
    pub session_name: String,
    /// Multicast group and port.
    pub group: SocketAddrV4,
    /// Unicast gap-fill request bind address.
    pub request_bind: SocketAddr,
    pub ttl: u32,
    pub loopback: bool,
    pub heartbeat_interval_ms: u64,
    pub retention_capacity: usize,
    pub base_sequence: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:9100".parse().unwrap(),
            instruments: vec![1],
            market_data: FeedSection {
                session_name: "MD".to_string(),
                group: "239.192.0.1:26400".parse().unwrap(),
                request_bind: "0.0.0.0:26401".parse().unwrap(),
                ..FeedSection::default()
            },
            trade_reports: FeedSection {
                session_name: "TR".to_string(),
                group: "239.192.0.2:26500".parse().unwrap(),
                request_bind: "0.0.0.0:26501".parse().unwrap(),
                ..FeedSection::default()
            },
        }
    }
}

impl Default for FeedSection {
    fn default() -> Self {
        Self {
            session_name: "FEED".to_string(),
            group: "239.192.0.1:26400".parse().unwrap(),
            request_bind: "0.0.0.0:0".parse().unwrap(),
            ttl: 1,
            loopback: false,
            heartbeat_interval_ms: 1000,
            retention_capacity: 65536,
            base_sequence: 1,
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: Config = serde_json::from_str(&raw)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        Ok(config)
    }

    pub fn instruments(&self) -> Vec<Instrument> {
        self.instruments.iter().copied().map(Instrument::new).collect()
    }
}

impl FeedSection {
    pub fn to_feed_config(&self) -> anyhow::Result<FeedConfig> {
        let session = SessionName::new(&self.session_name)
            .with_context(|| format!("invalid feed session name {:?}", self.session_name))?;
        Ok(FeedConfig {
            session,
            group: self.group,
            request_bind: self.request_bind,
            ttl: self.ttl,
            loopback: self.loopback,
            heartbeat_interval: Duration::from_millis(self.heartbeat_interval_ms),
            retention_capacity: self.retention_capacity,
            base_sequence: self.base_sequence,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(!config.instruments.is_empty());
        config.market_data.to_feed_config().unwrap();
        config.trade_reports.to_feed_config().unwrap();
    }

    #[test]
    fn test_partial_json_overrides_defaults() {
        let config: Config = serde_json::from_str(
            r#"{
                "listen_addr": "127.0.0.1:9200",
                "instruments": [1, 2, 3],
                "market_data": { "session_name": "MDTEST" }
            }"#,
        )
        .unwrap();

        assert_eq!(config.listen_addr, "127.0.0.1:9200".parse().unwrap());
        assert_eq!(config.instruments, vec![1, 2, 3]);
        assert_eq!(config.market_data.session_name, "MDTEST");
        // Untouched section keeps its defaults.
        assert_eq!(config.trade_reports.heartbeat_interval_ms, 1000);
    }

    #[test]
    fn test_overlong_session_name_rejected() {
        let section = FeedSection {
            session_name: "TOOLONGNAME".to_string(),
            ..FeedSection::default()
        };
        assert!(section.to_feed_config().is_err());
    }
}
