//! # statline-runner
//!
//! Demo host for the statline emission client.
//!
//! Loads a JSON configuration file, initializes logging and the stats
//! client, then emits a heartbeat counter plus a timed unit of work on an
//! interval until Ctrl+C.
//!
//! # Usage
//!
//! ```bash
//! statline-runner config.json --log-level info
//! ```

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use statline_emitter::{InitStatus, StatsClient};
use tracing::{error, info};

/// Statline statsd emission runner.
#[derive(Parser)]
#[command(name = "statline-runner", about = "Statline statsd emission runner")]
struct Cli {
    /// Configuration file path (JSON).
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Optional log directory for file output (overrides the config's
    /// agent.log_path).
    #[arg(long)]
    log_dir: Option<String>,

    /// Seconds between heartbeats.
    #[arg(long, default_value_t = 10)]
    interval_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1. Load configuration
    let config = statline_core::config::load_config(&cli.config)?;
    let agent_name = config.agent_name();

    // 2. Initialize logging
    let log_dir = cli.log_dir.clone().or_else(|| config.log_path());
    statline_core::logging::init_logging(&cli.log_level, log_dir.as_deref(), &agent_name);

    info!("{agent_name} starting — config={}, log_level={}", cli.config.display(), cli.log_level,);

    // 3. Configure and initialize the stats client
    let client = StatsClient::new();
    client.configure(config.stats.clone());
    match client.init(&agent_name) {
        Ok(InitStatus::Enabled) => info!("stats emission enabled"),
        Ok(InitStatus::Disabled) => info!("no stats section — emission disabled"),
        // Initialization failure is advisory: keep running without metrics.
        Err(e) => error!("stats init failed, continuing without metrics: {e}"),
    }

    info!("heartbeat every {}s — press Ctrl+C to stop", cli.interval_secs);

    // 4. Emit until shutdown signal
    let heartbeat = async {
        let mut ticker = tokio::time::interval(Duration::from_secs(cli.interval_secs));
        loop {
            ticker.tick().await;
            client.incr("heartbeat");
            client.time("heartbeat.work", || {
                // Stand-in for real agent work.
                std::hint::black_box((0..10_000u64).sum::<u64>());
            });
        }
    };

    tokio::select! {
        _ = heartbeat => {}
        _ = tokio::signal::ctrl_c() => {}
    }

    info!("shutdown signal received");

    // 5. Shut the client down
    client.shutdown();
    info!("stopped — goodbye");
    Ok(())
}
