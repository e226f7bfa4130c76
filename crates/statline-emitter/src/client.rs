//! The statsd emission client.
//!
//! [`StatsClient`] is an explicit context object: the host configures it
//! once at startup, then hands out references to whatever emits metrics.
//! The emission methods never fail from the caller's perspective —
//! monitoring must not become a new failure source for the monitored
//! process.
//!
//! # Lifecycle
//!
//! ```text
//! UNCONFIGURED --configure + init ok--> CONFIGURED
//! CONFIGURED   --shutdown------------> UNCONFIGURED
//! UNCONFIGURED --configure + init err-> UNCONFIGURED   (retriable)
//! ```

use std::time::Instant;

use parking_lot::RwLock;
use statline_core::StatlineError;
use statline_core::config::StatsSection;
use statline_core::line::{MetricKind, encode_line};
use tracing::{debug, error};

use crate::config::EmitterConfig;
use crate::sink::{MetricSink, UdpSink};

/// Outcome of a successful [`StatsClient::init`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitStatus {
    /// The client is active and will emit datagrams.
    Enabled,
    /// No `stats` section was staged; emission stays a no-op.
    Disabled,
}

/// Live emission state: the only socket handle plus the wire namespace.
/// Replaced wholesale on re-init, never mutated in place.
struct ActiveEmitter {
    sink: Box<dyn MetricSink>,
    namespace: String,
}

#[derive(Default)]
struct State {
    /// Section staged by `configure`, consumed by `init`.
    staged: Option<StatsSection>,
    /// `Some` iff the client is configured.
    active: Option<ActiveEmitter>,
}

/// Fire-and-forget statsd client.
///
/// Safe to share across threads: emission takes the read lock, lifecycle
/// transitions take the write lock, so concurrent emitters never observe a
/// half-updated destination/socket pair.
pub struct StatsClient {
    state: RwLock<State>,
}

impl StatsClient {
    /// Create an unconfigured client; every emission method is a no-op
    /// until [`configure`](Self::configure) + [`init`](Self::init) succeed.
    pub fn new() -> Self {
        Self { state: RwLock::new(State::default()) }
    }

    /// Activate the client with a caller-provided sink, bypassing socket
    /// setup. For hosts that route lines somewhere other than a UDP
    /// collector, and for exercising emission against in-memory sinks.
    pub fn with_sink(sink: Box<dyn MetricSink>, namespace: &str) -> Self {
        let state = State {
            staged: None,
            active: Some(ActiveEmitter { sink, namespace: namespace.to_string() }),
        };
        Self { state: RwLock::new(state) }
    }

    /// Stage the host's `stats` section for the next [`init`](Self::init).
    ///
    /// May be called repeatedly; each call replaces the previous staging.
    /// `None` stages the section-absent (disabled) state. A live client is
    /// not touched — re-pointing one requires `shutdown`, then `configure`
    /// + `init` again.
    pub fn configure(&self, section: Option<StatsSection>) {
        self.state.write().staged = section;
    }

    /// Resolve the staged configuration and open the UDP socket.
    ///
    /// Returns [`InitStatus::Disabled`] when no section is staged — a
    /// supported opt-in mode, not an error. Initialization failure leaves
    /// the client unconfigured and retriable; whether it is fatal is the
    /// host's call.
    pub fn init(&self, app_name: &str) -> Result<InitStatus, StatlineError> {
        let mut state = self.state.write();
        if state.active.is_some() {
            return Err(StatlineError::Config("already initialized; shutdown first".into()));
        }

        let Some(section) = state.staged.as_ref() else {
            debug!("[stats] no stats section configured, emission disabled");
            return Ok(InitStatus::Disabled);
        };

        let config = EmitterConfig::from_section(section, app_name)?;
        let sink = UdpSink::open(config.dest).map_err(|e| {
            error!("[stats] socket setup failed: {e}");
            StatlineError::Socket(e)
        })?;

        debug!("[stats] emitting to {} under namespace {:?}", config.dest, config.namespace);
        state.active = Some(ActiveEmitter { sink: Box::new(sink), namespace: config.namespace });
        Ok(InitStatus::Enabled)
    }

    /// Close the socket and return to the unconfigured state. Idempotent.
    pub fn shutdown(&self) {
        let mut state = self.state.write();
        if state.active.take().is_some() {
            debug!("[stats] shut down");
        }
    }

    /// Whether the client currently emits datagrams.
    pub fn is_active(&self) -> bool {
        self.state.read().active.is_some()
    }

    /// Increment `stat` by 1.
    pub fn incr(&self, stat: &str) {
        self.send_stat(stat, 1, MetricKind::Counter);
    }

    /// Decrement `stat` by 1.
    pub fn decr(&self, stat: &str) {
        self.send_stat(stat, -1, MetricKind::Counter);
    }

    /// Report an elapsed duration for `stat`, in milliseconds.
    pub fn timing(&self, stat: &str, millis: u64) {
        self.send_stat(stat, millis as i64, MetricKind::Timing);
    }

    /// Run `f`, reporting its wall-clock duration as a timing for `stat`.
    /// Returns whatever `f` returns.
    pub fn time<T>(&self, stat: &str, f: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let result = f();
        self.timing(stat, start.elapsed().as_millis() as u64);
        result
    }

    /// Encode one event and hand it to the sink.
    ///
    /// Every failure below this point is logged and swallowed: an emission
    /// call never returns an error and never blocks on delivery.
    fn send_stat(&self, stat: &str, value: i64, kind: MetricKind) {
        let state = self.state.read();
        let Some(active) = state.active.as_ref() else {
            return;
        };

        match encode_line(&active.namespace, stat, value, kind) {
            Ok(line) => {
                if let Err(e) = active.sink.emit(&line) {
                    error!("[stats] send failed: {e} (os error {:?})", e.raw_os_error());
                }
            }
            Err(e) => {
                debug!("[stats] dropping {stat:?}: {e}");
            }
        }
    }
}

impl Default for StatsClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::net::UdpSocket;
    use std::sync::Arc;
    use std::time::Duration;

    use parking_lot::Mutex;

    use super::*;
    use crate::sink::NopSink;

    struct RecordingSink {
        lines: Arc<Mutex<Vec<String>>>,
    }

    impl MetricSink for RecordingSink {
        fn emit(&self, line: &str) -> io::Result<usize> {
            self.lines.lock().push(line.to_string());
            Ok(line.len())
        }
    }

    struct FailingSink;

    impl MetricSink for FailingSink {
        fn emit(&self, _line: &str) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::ConnectionRefused))
        }
    }

    fn recording_client(namespace: &str) -> (StatsClient, Arc<Mutex<Vec<String>>>) {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let sink = RecordingSink { lines: Arc::clone(&lines) };
        (StatsClient::with_sink(Box::new(sink), namespace), lines)
    }

    #[test]
    fn unconfigured_client_is_a_no_op() {
        let client = StatsClient::new();
        assert!(!client.is_active());
        client.incr("foo");
        client.decr("foo");
        client.timing("foo", 10);
        assert_eq!(client.time("foo", || 7), 7);
    }

    #[test]
    fn incr_decr_encode_fixed_deltas() {
        let (client, lines) = recording_client("app");
        client.incr("checks.completed");
        client.decr("checks.completed");
        assert_eq!(
            *lines.lock(),
            vec!["app.checks.completed:1|c\n", "app.checks.completed:-1|c\n"]
        );
    }

    #[test]
    fn timing_encodes_supplied_duration() {
        let (client, lines) = recording_client("app");
        client.timing("request", 250);
        assert_eq!(*lines.lock(), vec!["app.request:250|ms\n"]);
    }

    #[test]
    fn time_runs_closure_and_reports_ms() {
        let (client, lines) = recording_client("app");
        let value = client.time("work", || 42);
        assert_eq!(value, 42);

        let lines = lines.lock();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("app.work:"));
        assert!(lines[0].ends_with("|ms\n"));
    }

    #[test]
    fn shutdown_is_idempotent_and_silences_emission() {
        let (client, lines) = recording_client("app");
        client.incr("before");
        client.shutdown();
        client.shutdown();
        client.incr("after");
        client.timing("after", 5);

        assert!(!client.is_active());
        assert_eq!(*lines.lock(), vec!["app.before:1|c\n"]);
    }

    #[test]
    fn sink_errors_are_swallowed() {
        let client = StatsClient::with_sink(Box::new(FailingSink), "app");
        client.incr("x");
        client.decr("x");
        client.timing("x", 1);
        assert!(client.is_active());
    }

    #[test]
    fn invalid_stat_names_are_dropped_not_sent() {
        let (client, lines) = recording_client("app");
        client.incr("bad:name");
        client.incr("bad|name");
        client.incr("bad\nname");
        assert!(lines.lock().is_empty());
    }

    #[test]
    fn nop_sink_client_stays_active() {
        let client = StatsClient::with_sink(Box::new(NopSink), "app");
        client.incr("anything");
        assert!(client.is_active());
    }

    #[test]
    fn init_without_section_reports_disabled() {
        let client = StatsClient::new();
        client.configure(None);
        assert_eq!(client.init("app").unwrap(), InitStatus::Disabled);
        assert!(!client.is_active());
    }

    #[test]
    fn init_with_bad_hostname_fails_and_stays_retriable() {
        let client = StatsClient::new();
        client.configure(Some(section_for("collector.internal", 8125)));
        assert!(client.init("app").is_err());
        assert!(!client.is_active());

        let (_collector, port) = bind_collector();
        client.configure(Some(section_for("127.0.0.1", port)));
        assert_eq!(client.init("app").unwrap(), InitStatus::Enabled);
        assert!(client.is_active());
        client.shutdown();
    }

    // -- loopback UDP round trips --

    fn bind_collector() -> (UdpSocket, u16) {
        let sock = UdpSocket::bind("127.0.0.1:0").unwrap();
        sock.set_read_timeout(Some(Duration::from_secs(2))).unwrap();
        let port = sock.local_addr().unwrap().port();
        (sock, port)
    }

    fn recv_line(sock: &UdpSocket) -> String {
        let mut buf = [0u8; 1024];
        let (n, _) = sock.recv_from(&mut buf).unwrap();
        String::from_utf8(buf[..n].to_vec()).unwrap()
    }

    fn section_for(hostname: &str, port: u16) -> StatsSection {
        StatsSection { hostname: Some(hostname.to_string()), port: Some(port), namespace: None }
    }

    #[test]
    fn configured_client_sends_one_datagram_per_event() {
        let (collector, port) = bind_collector();
        let client = StatsClient::new();
        client.configure(Some(section_for("127.0.0.1", port)));
        assert_eq!(client.init("checkd").unwrap(), InitStatus::Enabled);

        client.incr("foo");
        assert_eq!(recv_line(&collector), "checkd.foo:1|c\n");
        client.shutdown();
    }

    #[test]
    fn reinit_redirects_to_new_destination() {
        let (old, old_port) = bind_collector();
        let (new, new_port) = bind_collector();

        let client = StatsClient::new();
        client.configure(Some(section_for("127.0.0.1", old_port)));
        client.init("checkd").unwrap();
        client.incr("first");
        assert_eq!(recv_line(&old), "checkd.first:1|c\n");

        client.shutdown();
        client.configure(Some(section_for("127.0.0.1", new_port)));
        client.init("checkd").unwrap();
        client.incr("second");
        assert_eq!(recv_line(&new), "checkd.second:1|c\n");

        // The old collector sees nothing after the switch.
        old.set_read_timeout(Some(Duration::from_millis(200))).unwrap();
        let mut buf = [0u8; 64];
        assert!(old.recv_from(&mut buf).is_err());
        client.shutdown();
    }

    #[test]
    fn init_twice_without_shutdown_is_an_error() {
        let (_collector, port) = bind_collector();
        let client = StatsClient::new();
        client.configure(Some(section_for("127.0.0.1", port)));
        client.init("checkd").unwrap();

        assert!(client.init("checkd").is_err());
        // The failed re-init left the live emitter alone.
        assert!(client.is_active());
        client.shutdown();
    }
}
