//! # Path Search Engine
//!
//! Breadth-first enumeration of the shortest breeding chains between two
//! creatures.
//!
//! The breeding graph is implicit: nodes are creature names and, standing on
//! `current`, every partner `other != current` with a recorded child leads to
//! that child. Partners are tried in alphabetical order, so identical tables
//! always yield identical results.
//!
//! ## Bounds
//!
//! Every search is bounded by a path-count cap and an optional wall-clock
//! budget. The budget is polled once per dequeued frontier node. Hitting
//! either bound returns the paths accepted so far with `truncated` set.

use crate::primitives::DEFAULT_MAX_PATHS;
use crate::table::CombinationTable;
use crate::types::{BreedStep, BreedingPath, NameSide, SearchFailure};
use std::collections::{BTreeMap, VecDeque};
use std::time::{Duration, Instant};

// =============================================================================
// LIMITS
// =============================================================================

/// Bounds applied to a single path search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    /// Maximum number of paths to collect. `0` means no cap.
    pub max_paths: usize,
    /// Wall-clock budget. `None` means no budget.
    pub max_duration: Option<Duration>,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            max_paths: DEFAULT_MAX_PATHS,
            max_duration: None,
        }
    }
}

impl SearchLimits {
    #[must_use]
    pub fn new(max_paths: usize, max_duration: Option<Duration>) -> Self {
        Self {
            max_paths,
            max_duration,
        }
    }

    /// No path cap and no time budget.
    #[must_use]
    pub fn unbounded() -> Self {
        Self::new(0, None)
    }

    /// Check whether `count` accepted paths fill the cap.
    fn is_full(&self, count: usize) -> bool {
        self.max_paths > 0 && count >= self.max_paths
    }

    /// Check whether the time budget is spent.
    fn is_expired(&self, clock: Instant) -> bool {
        self.max_duration
            .is_some_and(|budget| clock.elapsed() >= budget)
    }
}

// =============================================================================
// RESULT
// =============================================================================

/// The outcome of a successful name resolution and search.
///
/// `paths` may be empty (no chain exists) and all of its entries share the
/// same step count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSearch {
    /// Resolved start name.
    pub start: String,
    /// Resolved target name.
    pub target: String,
    /// Accepted shortest paths, in discovery order.
    pub paths: Vec<BreedingPath>,
    /// True if a bound stopped the search before the frontier was exhausted.
    pub truncated: bool,
}

impl PathSearch {
    /// Step count shared by every returned path.
    #[must_use]
    pub fn min_steps(&self) -> Option<usize> {
        self.paths.first().map(BreedingPath::step_count)
    }

    /// Check if no path was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

// =============================================================================
// PATH FINDER
// =============================================================================

/// Shortest breeding-path search over a borrowed table.
#[derive(Debug, Clone, Copy)]
pub struct PathFinder<'a> {
    table: &'a CombinationTable,
}

impl<'a> PathFinder<'a> {
    /// Create a finder for `table`.
    #[must_use]
    pub fn new(table: &'a CombinationTable) -> Self {
        Self { table }
    }

    /// Find the shortest breeding paths from `start` to `target`.
    ///
    /// Names are normalized first. Unknown names produce
    /// `SearchFailure::UnknownName`; a valid query with no connecting chain
    /// returns an empty `PathSearch` (not an error).
    ///
    /// Invariants of the returned paths:
    /// - all have the same, minimal step count (unless truncated)
    /// - no creature appears twice on a path's chain
    /// - at most `limits.max_paths` entries when the cap is set
    pub fn find_shortest_paths(
        &self,
        start: &str,
        target: &str,
        limits: SearchLimits,
    ) -> Result<PathSearch, SearchFailure> {
        let (start, target) = match (self.table.resolve(start), self.table.resolve(target)) {
            (Some(start), Some(target)) => (start, target),
            (resolved_start, resolved_target) => {
                let side = match (resolved_start, resolved_target) {
                    (None, Some(_)) => NameSide::Start,
                    (Some(_), None) => NameSide::Target,
                    _ => NameSide::Both,
                };
                return Err(SearchFailure::UnknownName {
                    side,
                    start: resolved_start.unwrap_or(start).to_string(),
                    target: resolved_target.unwrap_or(target).to_string(),
                });
            }
        };

        if start == target {
            return Ok(PathSearch {
                start: start.to_string(),
                target: target.to_string(),
                paths: vec![BreedingPath::trivial(start)],
                truncated: false,
            });
        }

        let (paths, truncated) = self.breadth_first(start, target, limits);

        Ok(PathSearch {
            start: start.to_string(),
            target: target.to_string(),
            paths,
            truncated,
        })
    }

    /// The BFS proper. `start` and `target` are known, distinct names.
    fn breadth_first(
        &self,
        start: &'a str,
        target: &str,
        limits: SearchLimits,
    ) -> (Vec<BreedingPath>, bool) {
        let clock = Instant::now();

        let mut queue = VecDeque::from([BreedingPath::trivial(start)]);
        // Minimum step count at which each node has been enqueued
        let mut best_depth: BTreeMap<&'a str, usize> = BTreeMap::from([(start, 0)]);
        let mut best_solution: Option<usize> = None;
        let mut paths = Vec::new();

        while !queue.is_empty() {
            if limits.is_expired(clock) {
                return (paths, true);
            }
            let Some(path) = queue.pop_front() else {
                break;
            };

            let depth = path.step_count().saturating_add(1);
            if best_solution.is_some_and(|best| depth > best) {
                continue;
            }

            let current = path.end();
            for (partner, child) in self.table.partners(current) {
                if partner == current {
                    continue;
                }

                if child == target {
                    best_solution = Some(depth);
                    paths.push(path.extended(BreedStep::new(current, partner, child)));
                    if limits.is_full(paths.len()) {
                        return (paths, true);
                    }
                    continue;
                }

                // Anything enqueued now could only reach the target later
                // than the solutions already accepted.
                if best_solution.is_some() || path.visits(child) {
                    continue;
                }

                if best_depth.get(child).is_some_and(|&seen| seen < depth) {
                    continue;
                }
                best_depth.insert(child, depth);
                queue.push_back(path.extended(BreedStep::new(current, partner, child)));
            }
        }

        (paths, false)
    }
}

// =============================================================================
// TESTS
// =============================================================================
