//! # Query Module
//!
//! The two query shapes the engine answers, and their structured responses.
//!
//! - `Lookup`: two parents -> the child they produce
//! - `FindPaths`: one parent + a target child -> grouped shortest paths
//!
//! Query-level failures (unknown names, no path) are never `Err`: they come
//! back as responses with `success: false`, so presentation layers can render
//! them without special casing.

use crate::grouping::{PathNode, group_paths, structure_paths};
use crate::primitives::MAX_SUGGESTIONS;
use crate::search::{PathFinder, SearchLimits};
use crate::table::CombinationTable;
use crate::types::{NameSide, PalBreedError, ParentPair, SearchFailure};
use serde::{Deserialize, Serialize};

// =============================================================================
// QUERY
// =============================================================================

/// A single query against a combination table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// Which child do two parents produce?
    Lookup { parent1: String, parent2: String },

    /// Which shortest breeding chains lead from `start` to `target`?
    FindPaths {
        start: String,
        target: String,
        limits: SearchLimits,
    },
}

impl Query {
    /// Lookup helper.
    #[must_use]
    pub fn lookup(parent1: impl Into<String>, parent2: impl Into<String>) -> Self {
        Self::Lookup {
            parent1: parent1.into(),
            parent2: parent2.into(),
        }
    }

    /// Path search helper.
    #[must_use]
    pub fn find_paths(
        start: impl Into<String>,
        target: impl Into<String>,
        limits: SearchLimits,
    ) -> Self {
        Self::FindPaths {
            start: start.into(),
            target: target.into(),
            limits,
        }
    }

    /// Build a query from the three optional creature arguments.
    ///
    /// Exactly two must be given (blank strings count as absent):
    /// - `parent1` + `parent2` -> lookup
    /// - `parent1` + `child` or `parent2` + `child` -> path search
    ///
    /// Anything else is `PalBreedError::Usage`.
    pub fn from_parts(
        parent1: Option<&str>,
        parent2: Option<&str>,
        child: Option<&str>,
        limits: SearchLimits,
    ) -> Result<Self, PalBreedError> {
        fn given(arg: Option<&str>) -> Option<&str> {
            arg.map(str::trim).filter(|s| !s.is_empty())
        }

        match (given(parent1), given(parent2), given(child)) {
            (Some(p1), Some(p2), None) => Ok(Self::lookup(p1, p2)),
            (Some(p), None, Some(c)) | (None, Some(p), Some(c)) => {
                Ok(Self::find_paths(p, c, limits))
            }
            _ => Err(PalBreedError::Usage(
                "exactly two of parent1, parent2, child must be provided: \
                 parent1 + parent2 to find a child, or one parent + child to find paths"
                    .to_string(),
            )),
        }
    }

    /// Run the query.
    #[must_use]
    pub fn execute(&self, table: &CombinationTable) -> QueryResponse {
        match self {
            Self::Lookup { parent1, parent2 } => {
                QueryResponse::Lookup(lookup(table, parent1, parent2))
            }
            Self::FindPaths {
                start,
                target,
                limits,
            } => QueryResponse::Paths(find_paths(table, start, target, *limits)),
        }
    }
}

// =============================================================================
// RESPONSES
// =============================================================================

/// Response to a lookup. Parent names are echoed as given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupResponse {
    pub success: bool,
    pub parent1: String,
    pub parent2: String,
    pub child: Option<String>,
}

/// "Did you mean" names for each side of a failed path query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestions {
    pub start: Vec<String>,
    pub target: Vec<String>,
}

/// Successful path query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathsFound {
    pub success: bool,
    /// Resolved start name.
    pub start: String,
    /// Resolved target name.
    pub target: String,
    pub total_paths: usize,
    pub min_steps: usize,
    /// True if the path cap or time budget cut the search short.
    pub truncated: bool,
    pub paths: Vec<PathNode>,
}

/// Failed path query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathsNotFound {
    pub success: bool,
    pub message: String,
    pub suggestions: Suggestions,
}

/// Response to a path query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathsResponse {
    Found(PathsFound),
    NotFound(PathsNotFound),
}

impl PathsResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// Response to any query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryResponse {
    Lookup(LookupResponse),
    Paths(PathsResponse),
}

/// Response to a reverse lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentsResponse {
    pub success: bool,
    /// Resolved child name.
    pub child: String,
    pub parents: Vec<ParentPair>,
}

// =============================================================================
// OPERATIONS
// =============================================================================

/// Find the child of two parents.
#[must_use]
pub fn lookup(table: &CombinationTable, parent1: &str, parent2: &str) -> LookupResponse {
    let child = table.lookup_child(parent1, parent2).map(str::to_string);
    LookupResponse {
        success: child.is_some(),
        parent1: parent1.to_string(),
        parent2: parent2.to_string(),
        child,
    }
}

/// Find and group the shortest breeding paths from `start` to `target`.
#[must_use]
pub fn find_paths(
    table: &CombinationTable,
    start: &str,
    target: &str,
    limits: SearchLimits,
) -> PathsResponse {
    let failure = match PathFinder::new(table).find_shortest_paths(start, target, limits) {
        Ok(search) if !search.is_empty() => {
            let structured = structure_paths(&search.paths, &search.target);
            return PathsResponse::Found(PathsFound {
                success: true,
                total_paths: search.paths.len(),
                min_steps: search.min_steps().unwrap_or_default(),
                truncated: search.truncated,
                paths: group_paths(&structured),
                start: search.start,
                target: search.target,
            });
        }
        Ok(search) => SearchFailure::NoPathFound {
            start: search.start,
            target: search.target,
        },
        Err(failure) => failure,
    };

    let suggestions = match &failure {
        SearchFailure::UnknownName { side, .. } => {
            let similar = |name: &str, unknown: bool| {
                if unknown {
                    table.similar_names(name, MAX_SUGGESTIONS)
                } else {
                    Vec::new()
                }
            };
            Suggestions {
                start: similar(start, *side != NameSide::Target),
                target: similar(target, *side != NameSide::Start),
            }
        }
        SearchFailure::NoPathFound { .. } => Suggestions::default(),
    };

    PathsResponse::NotFound(PathsNotFound {
        success: false,
        message: failure.to_string(),
        suggestions,
    })
}

/// List every recorded parent pair of `child`.
#[must_use]
pub fn parents_of(table: &CombinationTable, child: &str) -> ParentsResponse {
    let parents = table.parents_of(child).to_vec();
    ParentsResponse {
        success: !parents.is_empty(),
        child: table.normalize(child).to_string(),
        parents,
    }
}

// =============================================================================
// TESTS
// =============================================================================
