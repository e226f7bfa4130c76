//! Transport seam for encoded statsd lines.
//!
//! Emission goes through the [`MetricSink`] trait so the client can be
//! exercised against in-memory doubles; production traffic uses [`UdpSink`],
//! one connectionless datagram per line.

use std::io;
use std::net::{Ipv4Addr, SocketAddr, UdpSocket};

/// A destination for encoded statsd lines.
///
/// Implementations must not block the caller. Delivery is best-effort: a
/// returned error means the line was dropped, nothing more, and callers
/// above the client are never shown it.
pub trait MetricSink: Send + Sync {
    /// Attempt to deliver one encoded line. Returns the number of bytes
    /// handed to the transport.
    fn emit(&self, line: &str) -> io::Result<usize>;
}

/// UDP transport: a single fire-and-forget datagram per line.
pub struct UdpSink {
    socket: UdpSocket,
    dest: SocketAddr,
}

impl UdpSink {
    /// Open an ephemeral local socket for sending to `dest`.
    ///
    /// The socket is write-only and nonblocking, so a full send buffer
    /// surfaces as an error instead of stalling the caller.
    pub fn open(dest: SocketAddr) -> io::Result<Self> {
        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))?;
        socket.set_nonblocking(true)?;
        Ok(Self { socket, dest })
    }

    /// The configured destination address.
    pub fn dest(&self) -> SocketAddr {
        self.dest
    }
}

impl MetricSink for UdpSink {
    fn emit(&self, line: &str) -> io::Result<usize> {
        self.socket.send_to(line.as_bytes(), self.dest)
    }
}

/// Sink that discards every line.
pub struct NopSink;

impl MetricSink for NopSink {
    fn emit(&self, _line: &str) -> io::Result<usize> {
        Ok(0)
    }
}
