//! # statline-emitter
//!
//! Fire-and-forget statsd emission for the statline agent.
//!
//! ## Architecture
//!
//! ```text
//! host config ──► StatsClient::configure + init ──► UdpSink ─── UDP ──► collector
//!                          │
//!    incr / decr / timing ─┘   (encode_line, one datagram per event)
//! ```
//!
//! The host owns a [`client::StatsClient`] and passes it by reference to
//! whatever needs to emit. Delivery is best-effort by design: collector
//! absence, unreachability, and send errors never surface to emitting code.
//!
//! ## Shared infrastructure
//!
//! - [`sink`] — `MetricSink` transport seam + UDP/no-op implementations
//! - [`config`] — resolution of the host's `stats` section with defaults
//! - [`client`] — lifecycle management and the emission API

pub mod client;
pub mod config;
pub mod sink;

pub use client::{InitStatus, StatsClient};
pub use config::EmitterConfig;
pub use sink::{MetricSink, NopSink, UdpSink};
