//! Configuration for minigfs components

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Cluster configuration shared by the master, chunkservers and clients.
///
/// All timing fields are in milliseconds so tests can shrink them; the
/// `*_interval`/`*_window` accessors expose them as [`Duration`]s.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Number of chunkservers selected per new chunk
    #[serde(default = "default_replication_factor")]
    pub replication_factor: usize,

    /// Period between chunkserver heartbeats, and between liveness sweeps
    #[serde(default = "default_heartbeat_interval")]
    pub heartbeat_interval_ms: u64,

    /// Heartbeat age beyond which a chunkserver is excluded from placement
    #[serde(default = "default_liveness_window")]
    pub liveness_window_ms: u64,

    /// How long a primary designation is recorded as valid
    #[serde(default = "default_lease_duration")]
    pub lease_duration_ms: u64,

    /// Upper bound on the read range requested per chunk
    #[serde(default = "default_chunk_size")]
    pub chunk_size: u64,

    /// Logging level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_replication_factor() -> usize {
    3
}
fn default_heartbeat_interval() -> u64 {
    5_000
}
fn default_liveness_window() -> u64 {
    30_000
}
fn default_lease_duration() -> u64 {
    60_000
}
fn default_chunk_size() -> u64 {
    64 * 1024 * 1024
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            replication_factor: default_replication_factor(),
            heartbeat_interval_ms: default_heartbeat_interval(),
            liveness_window_ms: default_liveness_window(),
            lease_duration_ms: default_lease_duration(),
            chunk_size: default_chunk_size(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from `minigfs.toml` (optional) and `MINIGFS_*`
    /// environment variables, falling back to defaults.
    pub fn load() -> crate::Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::File::with_name("minigfs").required(false))
            .add_source(config::Environment::with_prefix("MINIGFS"))
            .build()
            .map_err(|e| crate::Error::InvalidConfig(e.to_string()))?;

        let cfg: Config = cfg
            .try_deserialize()
            .map_err(|e| crate::Error::InvalidConfig(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject configurations that would wedge the cluster.
    pub fn validate(&self) -> crate::Result<()> {
        if self.replication_factor == 0 {
            return Err(crate::Error::InvalidConfig(
                "replication_factor must be at least 1".into(),
            ));
        }
        if self.heartbeat_interval_ms == 0 {
            return Err(crate::Error::InvalidConfig(
                "heartbeat_interval_ms must be non-zero".into(),
            ));
        }
        if self.liveness_window_ms == 0 {
            return Err(crate::Error::InvalidConfig(
                "liveness_window_ms must be non-zero".into(),
            ));
        }
        Ok(())
    }

    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_millis(self.heartbeat_interval_ms)
    }

    pub fn liveness_window(&self) -> Duration {
        Duration::from_millis(self.liveness_window_ms)
    }

    pub fn lease_duration(&self) -> Duration {
        Duration::from_millis(self.lease_duration_ms)
    }
}
