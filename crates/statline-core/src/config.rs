//! Host configuration model.
//!
//! The host process reads a single JSON config file. The top level carries
//! agent metadata plus an optional `stats` section describing the statsd
//! collector; an absent section disables metrics emission entirely.
//!
//! # Example config
//!
//! ```json
//! {
//!   "agent": { "name": "checkd", "log_path": "/var/log/checkd" },
//!   "stats": { "hostname": "127.0.0.1", "port": 8125, "namespace": "checkd" }
//! }
//! ```

use std::path::Path;

use serde::Deserialize;

/// Top-level application config, deserialized from a JSON file.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Agent metadata (name, log path).
    pub agent: Option<AgentMeta>,

    /// Statsd emission section. Absent means emission is disabled.
    pub stats: Option<StatsSection>,
}

/// Agent metadata block.
#[derive(Debug, Clone, Deserialize)]
pub struct AgentMeta {
    pub name: Option<String>,
    pub log_path: Option<String>,
}

impl AppConfig {
    /// Returns the agent name, falling back to `"statline"`.
    pub fn agent_name(&self) -> String {
        self.agent.as_ref().and_then(|a| a.name.clone()).unwrap_or_else(|| "statline".to_string())
    }

    /// Returns the log directory, if configured.
    pub fn log_path(&self) -> Option<String> {
        self.agent.as_ref().and_then(|a| a.log_path.clone())
    }
}

/// The `stats` section — where counter/timing lines are sent.
///
/// All keys are optional; effective defaults (`127.0.0.1:8125`, namespace =
/// agent name) are applied by the emitter when it resolves the section.
#[derive(Debug, Clone, Deserialize)]
pub struct StatsSection {
    /// Collector host, as an IPv4 dotted quad.
    pub hostname: Option<String>,

    /// Collector UDP port.
    pub port: Option<u16>,

    /// Namespace prefixed to every stat name on the wire.
    pub namespace: Option<String>,
}

/// Load and parse a JSON config file.
pub fn load_config(path: &Path) -> anyhow::Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = serde_json::from_str(&content)?;
    Ok(config)
}
