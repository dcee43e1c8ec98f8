//! XRP Ledger wallet gateway.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌──────────────────────────────────────────────┐
//!                         │                   GATEWAY                    │
//!                         │                                              │
//!   HTTP request          │  ┌─────────┐    ┌──────────┐   ┌──────────┐  │
//!   ──────────────────────┼─▶│  http   │───▶│ handlers │──▶│  ledger  │──┼──▶ rippled
//!                         │  │ server  │    │          │   │  client  │  │    JSON-RPC
//!                         │  └─────────┘    └────┬─────┘   └──────────┘  │
//!                         │                      │         ┌──────────┐  │
//!                         │                      ├────────▶│ hardware │  │
//!                         │                      │         └──────────┘  │
//!                         │                      ▼                       │
//!   WebSocket push        │  ┌─────────┐    ┌──────────┐   ┌──────────┐  │
//!   ◀─────────────────────┼──│   ws    │◀───│  events  │◀──│  price   │◀─┼─── price API
//!                         │  └─────────┘    └──────────┘   └──────────┘  │
//!                         │                                              │
//!                         │   config · observability · lifecycle         │
//!                         └──────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;

use xrpl_gateway::config;
use xrpl_gateway::lifecycle::{self, startup, Shutdown};

#[derive(Parser)]
#[command(name = "xrpl-gateway")]
#[command(about = "XRP Ledger wallet gateway", long_about = None)]
struct Args {
    /// Path to a TOML config file; defaults apply when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = config::load(args.config.as_deref())?;
    startup::init_observability(&config.observability);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "xrpl-gateway starting");

    let (server, listener) = lifecycle::start(config).await?;

    let shutdown = Shutdown::new();
    let mut server_task = tokio::spawn(server.run(listener, shutdown.subscribe()));

    tokio::select! {
        result = &mut server_task => {
            result??;
            return Ok(());
        }
        _ = lifecycle::wait_for_signal() => {}
    }

    shutdown.trigger();
    server_task.await??;

    tracing::info!("Shutdown complete");
    Ok(())
}
