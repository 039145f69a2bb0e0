//! Service configuration with TOML file support.

use serde::{Deserialize, Serialize};
use vouch_types::ServiceParams;

/// Configuration for the vouch daemon.
///
/// Can be loaded from a TOML file via [`ServiceConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Address to bind the RPC server to.
    #[serde(default = "default_bind")]
    pub bind: String,

    /// RPC server port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Seconds between webhook driver invocations.
    #[serde(default = "default_driver_interval")]
    pub driver_interval_secs: u64,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Seed a demo verifier, user and profile on startup (dev only).
    #[serde(default)]
    pub seed_demo: bool,

    /// Protocol parameters.
    #[serde(default)]
    pub params: ServiceParams,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_bind() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8710
}

fn default_driver_interval() -> u64 {
    5 * 60
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl ServiceConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(s)?)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
            driver_interval_secs: default_driver_interval(),
            log_level: default_log_level(),
            seed_demo: false,
            params: ServiceParams::default(),
        }
    }
}
