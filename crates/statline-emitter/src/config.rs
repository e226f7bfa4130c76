//! Emitter configuration extraction.
//!
//! Converts the host's optional `stats` section into a resolved
//! [`EmitterConfig`], applying defaults and rejecting unusable values at
//! init time instead of at send time.

use std::net::{Ipv4Addr, SocketAddr};

use statline_core::StatlineError;
use statline_core::config::StatsSection;

/// Default collector host.
pub const DEFAULT_HOSTNAME: &str = "127.0.0.1";
/// Default collector UDP port.
pub const DEFAULT_PORT: u16 = 8125;

/// Resolved emitter configuration.
#[derive(Debug, Clone)]
pub struct EmitterConfig {
    /// Where datagrams go.
    pub dest: SocketAddr,

    /// Prefix for every stat name on the wire.
    pub namespace: String,
}

impl EmitterConfig {
    /// Build an [`EmitterConfig`] from the host's `stats` section.
    ///
    /// `hostname` must be an IPv4 dotted quad; anything else, DNS names
    /// included, is a [`StatlineError::Address`]. The namespace falls back
    /// to `app_name` when the section does not override it, and is checked
    /// for protocol characters here so the encoder can trust it later.
    pub fn from_section(section: &StatsSection, app_name: &str) -> Result<Self, StatlineError> {
        let host = section.hostname.as_deref().unwrap_or(DEFAULT_HOSTNAME);
        let ip: Ipv4Addr = host.parse().map_err(|_| StatlineError::Address(host.to_string()))?;
        let port = section.port.unwrap_or(DEFAULT_PORT);

        let namespace = section.namespace.clone().unwrap_or_else(|| app_name.to_string());
        if namespace.is_empty() {
            return Err(StatlineError::Config("namespace must not be empty".into()));
        }
        if let Some(c) = namespace.chars().find(|&c| matches!(c, ':' | '|' | '\n')) {
            return Err(StatlineError::Config(format!(
                "namespace contains protocol character {c:?}"
            )));
        }

        Ok(Self { dest: SocketAddr::from((ip, port)), namespace })
    }
}
