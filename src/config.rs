use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use crate::error::ConfigError;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub network: NetworkConfig,
    pub detector: DetectorConfig,
    pub feed: FeedConfig,
    pub notifications: NotificationConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct NetworkConfig {
    pub rpc_url: String,
    pub rpc_user: Option<String>,
    pub rpc_password: Option<String>,
    /// Skips the `eth_chainId` lookup when set.
    pub chain_id: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DetectorConfig {
    /// Short prefix embedded in every alert id.
    pub developer_tag: String,
    pub observation_window_minutes: u64,
    /// Emit an info finding for every native deposit, not just threshold breaches.
    pub report_deposits: bool,
    /// Chain id → threshold in base units, as a decimal string.
    pub threshold_by_chain_id: HashMap<String, String>,
    /// Chain id → watched destination contracts.
    pub watched_addresses_by_chain_id: HashMap<String, Vec<String>>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct FeedConfig {
    /// JSON-lines transaction feed; `-` reads stdin.
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct NotificationConfig {
    pub enabled: bool,
    pub cooldown_seconds: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://127.0.0.1:8545".into(),
            rpc_user: None,
            rpc_password: None,
            chain_id: None,
        }
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            developer_tag: "LW".into(),
            observation_window_minutes: 20,
            report_deposits: false,
            threshold_by_chain_id: HashMap::new(),
            watched_addresses_by_chain_id: HashMap::new(),
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self { path: "-".into() }
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            cooldown_seconds: 30,
        }
    }
}

impl DetectorConfig {
    pub fn threshold_for(&self, chain_id: u64) -> Option<&str> {
        self.threshold_by_chain_id
            .get(&chain_id.to_string())
            .map(String::as_str)
    }

    pub fn watched_addresses_for(&self, chain_id: u64) -> Option<&[String]> {
        self.watched_addresses_by_chain_id
            .get(&chain_id.to_string())
            .map(Vec::as_slice)
    }
}

impl Config {
    /// Load config from a TOML file. Falls back to defaults if the file doesn't exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!("Config file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        tracing::info!("Config loaded from {}", path.display());
        Ok(config)
    }
}
