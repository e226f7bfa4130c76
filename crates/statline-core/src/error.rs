//! Typed error definitions for statline.
//!
//! [`StatlineError`] covers the initialization boundary only. Everything
//! below it — send and encode failures on the emission path — is logged and
//! swallowed, never raised to the emitting caller.

use thiserror::Error;

/// Errors surfaced to the host at initialization time.
#[derive(Debug, Error)]
pub enum StatlineError {
    /// Configuration parsing or validation error.
    #[error("config error: {0}")]
    Config(String),

    /// The configured collector hostname is not a usable IPv4 address.
    #[error("bad collector address: {0}")]
    Address(String),

    /// UDP socket creation or setup error.
    #[error("socket error: {0}")]
    Socket(#[from] std::io::Error),
}
