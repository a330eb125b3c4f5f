//! tagfix Lookup Service - Main Entry Point
//!
//! Loads one or more tag catalogue files and answers correction queries,
//! one JSON request per stdin line and one JSON response per stdout line.
//! Logs go to stderr.
//!
//! Usage:
//!     tagfix-lookup --catalogue danbooru.csv
//!     echo '{"op":"search","query":"blond_hair"}' | tagfix-lookup -c tags.csv
//!
//! Environment variables:
//! - `TAGFIX_CATALOGUE`: catalogue files, comma separated
//! - `TAGFIX_MAX_LIMIT`: upper bound for requested limits (default: 20)
//! - `TAGFIX_FUZZY`: fuzzy fallback on by default (default: false)
//! - `TAGFIX_FUZZY_MIN_SCORE`: minimum fuzzy score 0.0-1.0 (default: 0.6)
//! - `TAGFIX_MAX_QUERY_LEN`: longest accepted query in characters (default: 200)
//! - `RUST_LOG`: logging filter (default: info)

use std::sync::Arc;

use clap::Parser;
use tagfix_lookup::{serve, Args, LookupService};
use tokio::io::BufReader;
use tokio::signal;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    tagfix::tracing::init_with_filter(&args.log_level);

    info!("Initializing tagfix lookup service");
    info!("  Version: {}", env!("CARGO_PKG_VERSION"));

    let service = Arc::new(LookupService::from_args(&args)?);

    let loader = Arc::clone(&service);
    match tokio::task::spawn_blocking(move || loader.reload()).await? {
        Ok(summary) => info!(
            total_tags = summary.total_tags,
            total_aliases = summary.total_aliases,
            "Search engine loaded"
        ),
        Err(e) => warn!(error = %e, "Initial load failed, serving empty results until reload"),
    }

    serve(
        service,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
        shutdown_signal(),
    )
    .await?;

    info!("Lookup service shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received SIGTERM, shutting down");
        },
    }
}
