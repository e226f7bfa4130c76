//! Statsd line encoding.
//!
//! The statsd wire protocol is one ASCII line per datagram:
//!
//! ```text
//! <namespace>.<stat>:<value>|<type>\n
//! ```
//!
//! where `<type>` is `c` for counter deltas and `ms` for millisecond
//! timings. Encoding is pure — no I/O, no shared state.

use thiserror::Error;

/// Upper bound on an encoded line, in bytes.
///
/// A line that would exceed this is rejected with [`LineError::TooLong`]
/// rather than truncated; a truncated line is indistinguishable from a
/// different metric on the collector side.
pub const MAX_LINE_LEN: usize = 512;

/// Metric types understood by the collector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    /// Counter delta (`c`).
    Counter,
    /// Millisecond timing (`ms`).
    Timing,
}

impl MetricKind {
    /// Wire tag for this kind.
    pub fn tag(self) -> &'static str {
        match self {
            MetricKind::Counter => "c",
            MetricKind::Timing => "ms",
        }
    }
}

/// Errors produced by [`encode_line`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LineError {
    /// The stat name contains a character that would corrupt protocol
    /// framing.
    #[error("stat name contains protocol character {0:?}")]
    InvalidName(char),

    /// The encoded line would exceed [`MAX_LINE_LEN`] bytes.
    #[error("encoded line is {0} bytes, limit is {MAX_LINE_LEN}")]
    TooLong(usize),
}

/// Encode one metric event as a statsd line.
///
/// Stat names are dot-delimited hierarchies chosen by the caller and are not
/// escaped; a name carrying `:`, `|`, or a newline is rejected instead. The
/// namespace is trusted here — it is validated once at configuration time.
pub fn encode_line(
    namespace: &str,
    stat: &str,
    value: i64,
    kind: MetricKind,
) -> Result<String, LineError> {
    if let Some(c) = stat.chars().find(|&c| matches!(c, ':' | '|' | '\n')) {
        return Err(LineError::InvalidName(c));
    }

    let line = format!("{namespace}.{stat}:{value}|{}\n", kind.tag());
    if line.len() > MAX_LINE_LEN {
        return Err(LineError::TooLong(line.len()));
    }
    Ok(line)
}
