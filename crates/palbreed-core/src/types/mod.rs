//! # Core Type Definitions
//!
//! This module contains the core types for the palbreed engine:
//! - Input rows (`Combination`) and parent pairs (`ParentPair`)
//! - Search output (`BreedStep`, `BreedingPath`)
//! - Error types (`PalBreedError`, `SearchFailure`)
//!
//! ## Determinism Guarantees
//!
//! All types in this module:
//! - Treat creature names as opaque, case-sensitive strings
//! - Implement `Ord` where they take part in sorting, so that every ordering
//!   decision in the engine is reproducible

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// =============================================================================
// INPUT ROWS
// =============================================================================

/// One row of the combination table: `parent1 + parent2 = child`.
///
/// Rows come straight from the data source and may carry surrounding
/// whitespace or blank fields. [`Combination::trimmed`] yields the cleaned
/// fields, or `None` when the row has to be skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combination {
    /// The offspring.
    pub child: String,
    /// First parent.
    pub parent1: String,
    /// Second parent.
    pub parent2: String,
}

impl Combination {
    /// Create a new row.
    #[must_use]
    pub fn new(
        child: impl Into<String>,
        parent1: impl Into<String>,
        parent2: impl Into<String>,
    ) -> Self {
        Self {
            child: child.into(),
            parent1: parent1.into(),
            parent2: parent2.into(),
        }
    }

    /// Trimmed `(child, parent1, parent2)`, or `None` if any field is blank.
    #[must_use]
    pub fn trimmed(&self) -> Option<(&str, &str, &str)> {
        let child = self.child.trim();
        let parent1 = self.parent1.trim();
        let parent2 = self.parent2.trim();

        if child.is_empty() || parent1.is_empty() || parent2.is_empty() {
            return None;
        }
        Some((child, parent1, parent2))
    }
}

/// A pair of parents as recorded for a child, in source order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParentPair {
    pub parent1: String,
    pub parent2: String,
}

impl ParentPair {
    #[must_use]
    pub fn new(parent1: impl Into<String>, parent2: impl Into<String>) -> Self {
        Self {
            parent1: parent1.into(),
            parent2: parent2.into(),
        }
    }
}

// =============================================================================
// BREEDING STEP
// =============================================================================

/// One edge traversal of the breeding graph: `parent_a + parent_b = result`.
///
/// `parent_a` is always the node the search was standing on and `parent_b`
/// the partner it was bred with.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BreedStep {
    pub parent_a: String,
    pub parent_b: String,
    pub result: String,
}

impl BreedStep {
    /// Create a new step.
    #[must_use]
    pub fn new(
        parent_a: impl Into<String>,
        parent_b: impl Into<String>,
        result: impl Into<String>,
    ) -> Self {
        Self {
            parent_a: parent_a.into(),
            parent_b: parent_b.into(),
            result: result.into(),
        }
    }
}

impl fmt::Display for BreedStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} + {} = {}", self.parent_a, self.parent_b, self.result)
    }
}

// =============================================================================
// BREEDING PATH
// =============================================================================

/// A start creature followed by zero or more breeding steps.
///
/// A path with no steps means the start already is the target.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BreedingPath {
    start: String,
    steps: Vec<BreedStep>,
}

impl BreedingPath {
    /// A path consisting only of its start.
    #[must_use]
    pub fn trivial(start: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            steps: Vec::new(),
        }
    }

    /// Build a path from a start and its steps.
    #[must_use]
    pub fn from_steps(start: impl Into<String>, steps: Vec<BreedStep>) -> Self {
        Self {
            start: start.into(),
            steps,
        }
    }

    #[must_use]
    pub fn start(&self) -> &str {
        &self.start
    }

    #[must_use]
    pub fn steps(&self) -> &[BreedStep] {
        &self.steps
    }

    /// Number of breeding steps (the path's cost).
    #[must_use]
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// The creature this path ends on.
    #[must_use]
    pub fn end(&self) -> &str {
        self.steps.last().map_or(self.start.as_str(), |s| &s.result)
    }

    /// The chain of creatures visited: start, then each step's result.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        std::iter::once(self.start.as_str()).chain(self.steps.iter().map(|s| s.result.as_str()))
    }

    /// Check whether `name` is already on the chain.
    #[must_use]
    pub fn visits(&self, name: &str) -> bool {
        self.names().any(|n| n == name)
    }

    /// A copy of this path with one more step appended.
    #[must_use]
    pub fn extended(&self, step: BreedStep) -> Self {
        let mut steps = Vec::with_capacity(self.steps.len().saturating_add(1));
        steps.extend_from_slice(&self.steps);
        steps.push(step);
        Self {
            start: self.start.clone(),
            steps,
        }
    }
}

impl fmt::Display for BreedingPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.start)?;
        for step in &self.steps {
            write!(f, " -> {}", step)?;
        }
        Ok(())
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Which side of a path query carried an unknown name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameSide {
    Start,
    Target,
    Both,
}

/// Why a path query produced no paths.
///
/// These are reported to callers as structured data, never as process
/// failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchFailure {
    /// At least one of the names matched nothing, even case-insensitively.
    #[error("{}", unknown_message(.side, .start, .target))]
    UnknownName {
        side: NameSide,
        start: String,
        target: String,
    },

    /// Both names are known but no breeding chain connects them.
    #[error("No breeding path found from {start} to {target}")]
    NoPathFound { start: String, target: String },
}

fn unknown_message(side: &NameSide, start: &str, target: &str) -> String {
    match side {
        NameSide::Start => format!("Unknown parent Pal: {}", start),
        NameSide::Target => format!("Unknown target Pal: {}", target),
        NameSide::Both => format!("Unknown Pals: {} and {}", start, target),
    }
}

/// Errors that can occur outside of a query.
///
/// - Malformed rows are skipped, never reported here
/// - Query-level failures are `SearchFailure`s wrapped in responses
#[derive(Debug, Error)]
pub enum PalBreedError {
    /// The combination table could not be found.
    #[error("Breeding data not found: {0}")]
    DataSourceMissing(String),

    /// The data source was read but contained no usable combination.
    #[error("No breeding data found in {0}")]
    NoBreedingData(String),

    /// The CSV reader failed on the header or the underlying stream.
    #[error("CSV error: {0}")]
    Csv(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(String),

    /// The query arguments do not form exactly one query shape.
    #[error("Usage error: {0}")]
    Usage(String),

    /// The configuration could not be loaded or is invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

// =============================================================================
// TESTS
// =============================================================================
