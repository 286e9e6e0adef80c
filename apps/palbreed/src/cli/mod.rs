//! # palbreed CLI Module
//!
//! This module implements the CLI interface for palbreed.
//!
//! ## Available Commands
//!
//! - `query` - Lookup or path search, picked from which names are given
//! - `lookup` - Child of two parents
//! - `paths` - Shortest breeding paths from a parent to a child
//! - `parents` - Every parent pair producing a child
//! - `pals` - List known Pal names
//! - `status` - Show table statistics
//! - `serve` - Start the HTTP server

mod commands;

use crate::config::{Config, Overrides};
use clap::{Parser, Subcommand, ValueEnum};
use palbreed_core::PalBreedError;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// palbreed - Pal breeding calculator
///
/// Finds the child of two parents, or every shortest breeding chain from a
/// parent to a wanted child.
#[derive(Parser, Debug)]
#[command(name = "palbreed")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging (unless RUST_LOG is set)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banners and headings
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the breeding combinations CSV
    #[arg(short, long, global = true, visible_alias = "csv")]
    pub data: Option<PathBuf>,

    /// Path to a palbreed.toml config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Bounds shared by the path-searching commands.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct LimitArgs {
    /// Maximum number of paths to return (0 = no cap)
    #[arg(long)]
    pub max_paths: Option<usize>,

    /// Time budget for the search, in seconds
    #[arg(long)]
    pub max_seconds: Option<f64>,
}

/// Which names `pals` lists.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PalRole {
    /// Every known name
    #[default]
    All,
    /// Names that appear as a child
    Children,
    /// Names that appear as a parent
    Parents,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Lookup (parent1 + parent2) or path search (one parent + child)
    Query {
        /// First parent Pal name
        #[arg(long, visible_alias = "p1")]
        parent1: Option<String>,

        /// Second parent Pal name
        #[arg(long, visible_alias = "p2")]
        parent2: Option<String>,

        /// Target child Pal name
        #[arg(short, long)]
        child: Option<String>,

        #[command(flatten)]
        limits: LimitArgs,
    },

    /// Find the child of two parents
    Lookup {
        /// First parent Pal name
        parent1: String,

        /// Second parent Pal name
        parent2: String,
    },

    /// Find every shortest breeding path from a parent to a child
    Paths {
        /// Pal to start breeding from
        start: String,

        /// Pal to end up with
        target: String,

        #[command(flatten)]
        limits: LimitArgs,
    },

    /// List every parent pair producing a child
    Parents {
        /// Child Pal name
        child: String,
    },

    /// List known Pal names
    Pals {
        /// Which names to list
        #[arg(short, long, value_enum, default_value_t = PalRole::All)]
        role: PalRole,
    },

    /// Show combination table statistics
    Status,

    /// Start HTTP server
    Serve {
        /// Host to bind to
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,

        #[command(flatten)]
        limits: LimitArgs,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

impl Cli {
    /// Settings from flags, before the file and environment layers.
    fn overrides(&self) -> Overrides {
        let mut overrides = Overrides {
            data: self.data.clone(),
            ..Overrides::default()
        };

        match &self.command {
            Some(Commands::Query { limits, .. } | Commands::Paths { limits, .. }) => {
                overrides.max_paths = limits.max_paths;
                overrides.max_seconds = limits.max_seconds;
            }
            Some(Commands::Serve { host, port, limits }) => {
                overrides.host = host.clone();
                overrides.port = *port;
                overrides.max_paths = limits.max_paths;
                overrides.max_seconds = limits.max_seconds;
            }
            _ => {}
        }

        overrides
    }
}

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), PalBreedError> {
    let config = Config::load(cli.config.as_deref(), cli.overrides())?;
    let output = Output {
        json: cli.json,
        quiet: cli.quiet,
    };

    match cli.command {
        Some(Commands::Query {
            parent1,
            parent2,
            child,
            ..
        }) => cmd_query(
            &config,
            output,
            parent1.as_deref(),
            parent2.as_deref(),
            child.as_deref(),
        ),
        Some(Commands::Lookup { parent1, parent2 }) => {
            cmd_lookup(&config, output, &parent1, &parent2)
        }
        Some(Commands::Paths { start, target, .. }) => cmd_paths(&config, output, &start, &target),
        Some(Commands::Parents { child }) => cmd_parents(&config, output, &child),
        Some(Commands::Pals { role }) => cmd_pals(&config, output, role),
        Some(Commands::Status) => cmd_status(&config, output),
        Some(Commands::Serve { .. }) => cmd_serve(&config, output).await,
        None => {
            // No subcommand - show status by default
            cmd_status(&config, output)
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
