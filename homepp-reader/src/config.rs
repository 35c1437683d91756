use std::net::SocketAddr;
use std::path::Path;

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub envelope: EnvelopeConfig,
    /// HTTP health/stats endpoint. Disabled when absent.
    pub server: Option<ServerConfig>,
    pub source: SourceConfig,
}

/// Placeholder identity stamped on every envelope.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct EnvelopeConfig {
    /// Sensor id used when the source does not supply one
    pub id: u32,
    /// Sensor status reported in every envelope
    pub status: u32,
}

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    /// Address for the HTTP server to listen on
    pub http_addr: SocketAddr,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SourceConfig {
    Serial {
        /// Serial device path
        port: String,
        #[serde(default = "default_baud_rate")]
        baud_rate: u32,
        /// Read timeout in milliseconds before re-checking for shutdown
        #[serde(default = "default_timeout_ms")]
        timeout_ms: u64,
        /// Interval in seconds before reopening a failed port
        #[serde(default = "default_reopen_interval_secs")]
        reopen_interval_secs: u64,
    },
    Synthetic {
        /// Lower bound in seconds between generated readings
        min_interval_secs: u64,
        /// Upper bound in seconds between generated readings
        max_interval_secs: u64,
        /// Number of fake sensor ids to draw from
        id_pool_size: usize,
    },
}

fn default_baud_rate() -> u32 {
    115_200
}

fn default_timeout_ms() -> u64 {
    1_000
}

fn default_reopen_interval_secs() -> u64 {
    5
}

impl SourceConfig {
    pub fn synthetic() -> Self {
        SourceConfig::Synthetic {
            min_interval_secs: 1,
            max_interval_secs: 10,
            id_pool_size: 10,
        }
    }
}

impl Default for EnvelopeConfig {
    fn default() -> Self {
        Self { id: 1, status: 1 }
    }
}

impl Config {
    pub fn load(path: &Path) -> color_eyre::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            envelope: EnvelopeConfig::default(),
            server: None,
            source: SourceConfig::Serial {
                port: "/dev/ttyAMA0".to_string(),
                baud_rate: default_baud_rate(),
                timeout_ms: default_timeout_ms(),
                reopen_interval_secs: default_reopen_interval_secs(),
            },
        }
    }
}
