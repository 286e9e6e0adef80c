//! # palbreed - Pal Breeding Calculator
//!
//! The main binary for the palbreed breeding engine.
//!
//! This application provides:
//! - CLI interface for breeding lookups and path searches
//! - HTTP REST API server (axum-based)
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │           apps/palbreed (THE BINARY)          │
//! │                                               │
//! │  ┌─────────────┐    ┌─────────────┐           │
//! │  │   CLI       │    │   HTTP API  │           │
//! │  │  (clap)     │    │   (axum)    │           │
//! │  └──────┬──────┘    └──────┬──────┘           │
//! │         └────────┬─────────┘                  │
//! │                  ▼                            │
//! │          ┌───────────────┐                    │
//! │          │ palbreed-core │                    │
//! │          │  (THE LOGIC)  │                    │
//! │          └───────────────┘                    │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Child of two parents
//! palbreed query --p1 Lamball --p2 Cattiva
//!
//! # Shortest breeding paths, as JSON
//! palbreed --json query --p1 Lamball -c Anubis --max-paths 10
//!
//! # Start the HTTP server
//! palbreed serve --host 0.0.0.0 --port 8080
//! ```

use clap::Parser;
use palbreed::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = cli::Cli::parse();

    init_tracing(cli.verbose);

    // Execute command
    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing on stderr. PALBREED_LOG_FORMAT=json enables
/// machine-parseable output.
fn init_tracing(verbose: bool) {
    let log_format = std::env::var("PALBREED_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let default_filter = if verbose {
        "palbreed=debug,tower_http=debug"
    } else {
        "palbreed=info,tower_http=debug"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}
