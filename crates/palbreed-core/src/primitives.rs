//! # Primitives
//!
//! Fixed constants for the palbreed engine.
//!
//! These are compiled into the binary and are immutable at runtime.
//! Callers override the query limits per request; the constants only
//! supply defaults.

/// Default cap on the number of shortest paths collected by one search.
///
/// - `0` disables the cap (the search is then bounded only by time).
pub const DEFAULT_MAX_PATHS: usize = 20;

/// Maximum number of "did you mean" names attached to a failed query.
pub const MAX_SUGGESTIONS: usize = 5;

/// Number of suggestions shown per name in human-readable output.
pub const DISPLAY_SUGGESTIONS: usize = 3;

/// Column holding the offspring in the combination CSV.
pub const CHILD_COLUMN: &str = "child";

/// Column holding the first parent in the combination CSV.
pub const PARENT1_COLUMN: &str = "parent1";

/// Column holding the second parent in the combination CSV.
pub const PARENT2_COLUMN: &str = "parent2";

/// Default file name of the combination table.
pub const DEFAULT_DATA_FILE: &str = "palworld_breeding_combinations.csv";
