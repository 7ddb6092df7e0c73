//! Royale relay server.
//!
//! Serves the dashboard's data routes and forwards them to the
//! game-statistics API.
//!
//! # Architecture Overview
//!
//! ```text
//!                          ┌──────────────────────────────────────────────┐
//!                          │                 ROYALE RELAY                 │
//!                          │                                              │
//!   Dashboard request      │  ┌──────────┐    ┌──────────┐    ┌────────┐  │
//!   ───────────────────────┼─▶│  http    │───▶│ handlers │───▶│  tag   │  │
//!                          │  │ server   │    │ clan     │    └────────┘  │
//!                          │  └──────────┘    │ player   │                │
//!                          │                  │ proxy    │                │
//!                          │                  └────┬─────┘                │
//!                          │                       ▼                      │
//!   JSON response          │                 ┌──────────┐                 │
//!   ◀──────────────────────┼─────────────────│ upstream │◀────────────────┼──── Game API
//!                          │                 │  client  │                 │     (official /
//!                          │                 └──────────┘                 │      mirror)
//!                          │  ┌────────────────────────────────────────┐  │
//!                          │  │ config · observability · lifecycle     │  │
//!                          │  └────────────────────────────────────────┘  │
//!                          └──────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;

use royale_relay::config::{load_config, Credentials, RelayConfig};
use royale_relay::lifecycle::signals::spawn_signal_handler;
use royale_relay::observability::{logging, metrics};
use royale_relay::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "royale-relay")]
#[command(about = "Relay between the stats dashboard and the game API", long_about = None)]
struct Args {
    /// Path to a TOML config file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => RelayConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    logging::init_logging(&config.observability);

    tracing::info!("royale-relay v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        official = %config.upstreams.official.base_url,
        mirror = %config.upstreams.mirror.base_url,
        player_upstream = ?config.routes.player_upstream,
        upstream_timeout_secs = config.timeouts.upstream_secs,
        "Configuration loaded"
    );

    let credentials = Credentials::from_env(&config.upstreams);

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        "Listening for connections"
    );

    let shutdown = Shutdown::new();
    spawn_signal_handler(&shutdown);

    let server = HttpServer::new(config, credentials)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
