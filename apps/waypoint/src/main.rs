//! # Waypoint
//!
//! The command-line binary for the Waypoint graph engine.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  apps/waypoint (THE BINARY)              │
//! │                                                          │
//! │  ┌───────────┐    ┌────────────┐    ┌────────────────┐   │
//! │  │   CLI     │    │  AppState  │    │    Storage     │   │
//! │  │  (clap)   │───▶│ (owns the  │◀──▶│ (document file │   │
//! │  └───────────┘    │   graph)   │    │   read/write)  │   │
//! │                   └─────┬──────┘    └────────────────┘   │
//! │                         ▼                                │
//! │                 ┌───────────────┐                        │
//! │                 │ waypoint-core │                        │
//! │                 │ (THE ENGINE)  │                        │
//! │                 └───────────────┘                        │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! waypoint init
//! waypoint add-node --x 0 --y 0
//! waypoint add-node --x 1 --y 0 --ready
//! waypoint add-edge -f 0,0 -t 1,0 -w 3
//! waypoint path -f 0,0 -t 1,0
//! waypoint nearest -f 0,0 -n 3
//! ```

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use waypoint::cli::{self, Cli};
use waypoint::{AppConfig, LogFormat};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref());

    // WAYPOINT_LOG_FORMAT wins over the config file.
    let log_format = std::env::var("WAYPOINT_LOG_FORMAT")
        .ok()
        .and_then(|v| LogFormat::parse(&v))
        .or_else(|| config.as_ref().ok().map(|c| c.log_format))
        .unwrap_or_default();
    init_tracing(log_format, cli.verbose);

    let result = config.and_then(|config| cli::execute(cli, &config));
    if let Err(e) = result {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing on stderr so stdout stays clean for `--json` output.
fn init_tracing(format: LogFormat, verbose: bool) {
    let default_filter = if verbose {
        "waypoint=debug,waypoint_core=debug"
    } else {
        "waypoint=info,waypoint_core=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}
