//! # palbreed-core
//!
//! The deterministic breeding engine for palbreed - THE LOGIC.
//!
//! Given a table of `parent1 + parent2 = child` combinations, this crate
//! answers two questions:
//! - Which child do two parents produce? (`query::lookup`)
//! - What are the shortest breeding chains from one creature to another?
//!   (`query::find_paths`)
//!
//! Shortest-chain results are shaped into a tree of shared step prefixes by
//! the `grouping` module, ready for a presentation layer to render.
//!
//! ## Architectural Constraints
//!
//! - The table is built once and never mutated afterward
//! - Every search is bounded by a path cap and an optional time budget
//! - Has NO async, NO network dependencies (pure Rust)
//! - Deterministic: identical input yields identical output, no HashMap

// =============================================================================
// MODULES
// =============================================================================

pub mod formats;
pub mod grouping;
pub mod primitives;
pub mod query;
pub mod search;
pub mod table;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    BreedStep, BreedingPath, Combination, NameSide, PalBreedError, ParentPair, SearchFailure,
};

// =============================================================================
// RE-EXPORTS: Engine
// =============================================================================

pub use grouping::{PathNode, PathStep, StructuredPath, group_paths, leaves, structure_paths};
pub use query::{
    LookupResponse, ParentsResponse, PathsFound, PathsNotFound, PathsResponse, Query,
    QueryResponse, Suggestions,
};
pub use search::{PathFinder, PathSearch, SearchLimits};
pub use table::{CombinationTable, TableStats};

// =============================================================================
// RE-EXPORTS: Formats (from formats module)
// =============================================================================

pub use formats::{MAX_DATA_FILE_SIZE, load_table, read_table};
