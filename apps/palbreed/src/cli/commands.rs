//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.
//!
//! Every command prints either a human-readable report or, with `--json`,
//! the serialized response. Logs go to stderr, so JSON on stdout stays
//! machine-parseable.

use super::PalRole;
use crate::api;
use crate::config::Config;
use palbreed_core::{
    CombinationTable, LookupResponse, PalBreedError, ParentsResponse, PathNode, PathStep,
    PathsResponse, Query, QueryResponse, SearchLimits, StructuredPath, leaves, load_table,
    primitives::{DISPLAY_SUGGESTIONS, MAX_SUGGESTIONS},
    query,
};
use serde::Serialize;
use std::time::Instant;

// =============================================================================
// OUTPUT MODE
// =============================================================================

/// How results are printed.
#[derive(Debug, Clone, Copy, Default)]
pub struct Output {
    /// Print JSON instead of text.
    pub json: bool,
    /// Skip banners and headings.
    pub quiet: bool,
}

/// Pretty-print any response as JSON.
fn print_json<T: Serialize>(value: &T) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

// =============================================================================
// TABLE LOADING
// =============================================================================

/// Load the combination table named by `config`.
///
/// An empty table is an error: no query can succeed against it.
pub fn load_configured_table(config: &Config) -> Result<CombinationTable, PalBreedError> {
    let table = load_table(&config.data)?;

    if table.is_empty() {
        return Err(PalBreedError::NoBreedingData(config.data.display().to_string()));
    }

    tracing::info!(
        "Loaded {} breeding combinations for {} Pals",
        table.combination_count(),
        table.pal_count()
    );
    if table.skipped_rows() > 0 {
        tracing::warn!("Skipped {} malformed rows", table.skipped_rows());
    }

    Ok(table)
}

// =============================================================================
// QUERY COMMAND
// =============================================================================

/// Run whichever query the given names describe.
pub fn cmd_query(
    config: &Config,
    output: Output,
    parent1: Option<&str>,
    parent2: Option<&str>,
    child: Option<&str>,
) -> Result<(), PalBreedError> {
    let query = Query::from_parts(parent1, parent2, child, config.limits)?;
    let table = load_configured_table(config)?;

    match query {
        Query::Lookup { parent1, parent2 } => run_lookup(&table, output, &parent1, &parent2),
        Query::FindPaths {
            start,
            target,
            limits,
        } => run_paths(&table, output, &start, &target, limits),
    }

    Ok(())
}

// =============================================================================
// LOOKUP COMMAND
// =============================================================================

/// Find the child of two parents.
pub fn cmd_lookup(
    config: &Config,
    output: Output,
    parent1: &str,
    parent2: &str,
) -> Result<(), PalBreedError> {
    let table = load_configured_table(config)?;
    run_lookup(&table, output, parent1, parent2);
    Ok(())
}

fn run_lookup(table: &CombinationTable, output: Output, parent1: &str, parent2: &str) {
    let response = query::lookup(table, parent1, parent2);

    if output.json {
        print_json(&QueryResponse::Lookup(response));
    } else {
        print!("{}", render_lookup(table, &response));
    }
}

/// Text report for a lookup, with "did you mean" hints on failure.
pub fn render_lookup(table: &CombinationTable, response: &LookupResponse) -> String {
    let (parent1, parent2) = (&response.parent1, &response.parent2);

    let Some(child) = &response.child else {
        let mut out = format!(
            "\nNo breeding combination found for {} + {}\n",
            parent1, parent2
        );
        for name in [parent1, parent2] {
            let similar = table.similar_names(name, MAX_SUGGESTIONS);
            if !similar.is_empty() {
                let shown: Vec<&str> = similar
                    .iter()
                    .take(DISPLAY_SUGGESTIONS)
                    .map(String::as_str)
                    .collect();
                out.push_str(&format!(
                    "   Did you mean one of these for '{}': {}\n",
                    name,
                    shown.join(", ")
                ));
            }
        }
        return out;
    };

    format!(
        "\nBreeding Result:\n   {} + {} = {}\n",
        parent1, parent2, child
    )
}

// =============================================================================
// PATHS COMMAND
// =============================================================================

/// Find the shortest breeding paths from `start` to `target`.
pub fn cmd_paths(
    config: &Config,
    output: Output,
    start: &str,
    target: &str,
) -> Result<(), PalBreedError> {
    let table = load_configured_table(config)?;
    run_paths(&table, output, start, target, config.limits);
    Ok(())
}

fn run_paths(
    table: &CombinationTable,
    output: Output,
    start: &str,
    target: &str,
    limits: SearchLimits,
) {
    let clock = Instant::now();
    let response = query::find_paths(table, start, target, limits);
    log_search(&response, clock);

    if output.json {
        print_json(&QueryResponse::Paths(response));
    } else {
        print!("{}", render_paths(&response));
    }
}

/// Record how a search went.
pub fn log_search(response: &PathsResponse, clock: Instant) {
    let elapsed_ms = u64::try_from(clock.elapsed().as_millis()).unwrap_or(u64::MAX);
    match response {
        PathsResponse::Found(found) => {
            tracing::info!(
                start = %found.start,
                target = %found.target,
                paths = found.total_paths,
                min_steps = found.min_steps,
                elapsed_ms,
                "Path search finished"
            );
            if found.truncated {
                tracing::warn!("Path search stopped early; more shortest paths may exist");
            }
        }
        PathsResponse::NotFound(failure) => {
            tracing::info!(elapsed_ms, "Path search failed: {}", failure.message);
        }
    }
}

/// The distinct paths of a tree, in search order.
///
/// The promoted shortest path appears twice in the tree; it is listed once.
fn flat_paths(nodes: &[PathNode]) -> Vec<&StructuredPath> {
    let mut paths = leaves(nodes);
    paths.sort_by_key(|path| path.id);
    paths.dedup_by_key(|path| path.id);
    paths
}

/// Text report for a path search.
pub fn render_paths(response: &PathsResponse) -> String {
    let found = match response {
        PathsResponse::Found(found) => found,
        PathsResponse::NotFound(failure) => {
            let mut out = format!("{}\n", failure.message);
            for (side, names) in [
                ("start", &failure.suggestions.start),
                ("target", &failure.suggestions.target),
            ] {
                if !names.is_empty() {
                    let shown: Vec<&str> = names
                        .iter()
                        .take(DISPLAY_SUGGESTIONS)
                        .map(String::as_str)
                        .collect();
                    out.push_str(&format!(
                        "   Did you mean one of these for the {}: {}\n",
                        side,
                        shown.join(", ")
                    ));
                }
            }
            return out;
        }
    };

    let mut out = format!(
        "Found {} shortest breeding path(s) from {} to {}:\n(Path length: {} breeding steps)\n",
        found.total_paths, found.start, found.target, found.min_steps
    );
    if found.truncated {
        out.push_str("(Search stopped early; more paths may exist)\n");
    }

    for (number, path) in flat_paths(&found.paths).into_iter().enumerate() {
        out.push_str(&format!("Path {}:\n", number.saturating_add(1)));
        for step in &path.steps {
            match step {
                PathStep::Start { pal, .. } => {
                    out.push_str(&format!("  Start: {}\n", pal));
                }
                PathStep::Breed {
                    parents, result, ..
                } => {
                    out.push_str(&format!(
                        "  Step: {} + {} = {}\n",
                        parents.parent1, parents.parent2, result
                    ));
                }
            }
        }
    }

    out
}

// =============================================================================
// PARENTS COMMAND
// =============================================================================

/// List every parent pair producing `child`.
pub fn cmd_parents(config: &Config, output: Output, child: &str) -> Result<(), PalBreedError> {
    let table = load_configured_table(config)?;
    let response = query::parents_of(&table, child);

    if output.json {
        print_json(&response);
    } else {
        print!("{}", render_parents(&response));
    }
    Ok(())
}

/// Text report for a reverse lookup.
pub fn render_parents(response: &ParentsResponse) -> String {
    if !response.success {
        return format!("No breeding combination produces {}\n", response.child);
    }

    let mut out = format!(
        "{} parent pair(s) produce {}:\n",
        response.parents.len(),
        response.child
    );
    for pair in &response.parents {
        out.push_str(&format!("   {} + {}\n", pair.parent1, pair.parent2));
    }
    out
}

// =============================================================================
// PALS COMMAND
// =============================================================================

/// List known names.
pub fn cmd_pals(config: &Config, output: Output, role: PalRole) -> Result<(), PalBreedError> {
    let table = load_configured_table(config)?;
    let names = pal_names(&table, role);

    if output.json {
        print_json(&names);
        return Ok(());
    }

    for name in names {
        println!("{}", name);
    }
    Ok(())
}

/// Names for a role, alphabetical.
pub fn pal_names(table: &CombinationTable, role: PalRole) -> Vec<&str> {
    match role {
        PalRole::All => table.names().collect(),
        PalRole::Children => table.children().collect(),
        PalRole::Parents => table.parents().collect(),
    }
}

// =============================================================================
// STATUS COMMAND
// =============================================================================

/// Show table statistics.
pub fn cmd_status(config: &Config, output: Output) -> Result<(), PalBreedError> {
    let table = load_configured_table(config)?;
    let stats = table.stats();

    if output.json {
        let value = serde_json::json!({
            "data": config.data.to_string_lossy(),
            "pal_count": stats.pal_count,
            "combination_count": stats.combination_count,
            "skipped_rows": stats.skipped_rows,
        });
        print_json(&value);
        return Ok(());
    }

    if !output.quiet {
        println!("palbreed Table Status");
        println!("=====================");
    }
    println!("Data:         {}", config.data.display());
    println!("Pals:         {}", stats.pal_count);
    println!("Combinations: {}", stats.combination_count);
    println!("Skipped Rows: {}", stats.skipped_rows);

    Ok(())
}

// =============================================================================
// SERVE COMMAND
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_serve(config: &Config, output: Output) -> Result<(), PalBreedError> {
    let table = load_configured_table(config)?;
    let addr = config.bind_addr();
    let limits = config.serve_limits();

    if !output.quiet {
        println!("palbreed Server Starting...");
        println!();
        println!("Configuration:");
        println!("  Address:   {}", addr);
        println!("  Data:      {}", config.data.display());
        println!("  Max Paths: {}", limits.max_paths);
        if let Some(budget) = limits.max_duration {
            println!("  Budget:    {:.1}s", budget.as_secs_f64());
        }
        println!();
        println!("Endpoints:");
        println!("  GET  /health          - Health check");
        println!("  GET  /status          - Table statistics");
        println!("  POST /lookup          - Child of two parents");
        println!("  POST /paths           - Shortest breeding paths");
        println!("  GET  /parents/{{child}} - Parent pairs of a child");
        println!();
        println!("Press Ctrl+C to stop");
        println!();
    }

    api::run_server(&addr, table, limits).await
}

// =============================================================================
// TESTS
// =============================================================================
