//! # statline-core
//!
//! Core crate for the statline metrics emission system, providing:
//!
//! - **Configuration** (`config`) — JSON host-config deserialization
//! - **Error types** (`error`) — domain-specific `StatlineError` via thiserror
//! - **Line encoding** (`line`) — statsd wire-format encoder
//! - **Logging** (`logging`) — tracing-based structured logging

pub mod config;
pub mod error;
pub mod line;
pub mod logging;

pub use error::StatlineError;
pub use line::{LineError, MAX_LINE_LEN, MetricKind, encode_line};
