//! # Combination Table
//!
//! The immutable index of known breeding combinations.
//!
//! The table is built once from `(child, parent1, parent2)` rows and is
//! read-only afterward. All data structures use `BTreeMap`/`BTreeSet` so that
//! name normalization, suggestions and neighbor iteration are reproducible
//! across runs.

use crate::types::{Combination, ParentPair};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::{BTreeMap, BTreeSet};

/// Size summary of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableStats {
    pub pal_count: usize,
    pub combination_count: usize,
    pub skipped_rows: usize,
}

/// The breeding combination table.
///
/// Breeding is commutative: every row is stored under both parent orders, so
/// lookups never have to normalize the pair.
#[derive(Debug, Clone, Default)]
pub struct CombinationTable {
    /// Adjacency: parent -> (partner -> child)
    forward: BTreeMap<String, BTreeMap<String, String>>,

    /// Reverse lookup: child -> parent pairs, in insertion order
    reverse: BTreeMap<String, Vec<ParentPair>>,

    /// Every name seen as parent or child
    names: BTreeSet<String>,

    /// Rows dropped because a field was blank
    skipped_rows: usize,
}

impl CombinationTable {
    /// Create a new empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from input rows.
    ///
    /// Rows with any blank field (after trimming) are skipped and counted in
    /// [`CombinationTable::skipped_rows`]. Duplicate pairs keep the last child.
    #[must_use]
    pub fn build<I>(rows: I) -> Self
    where
        I: IntoIterator,
        I::Item: Borrow<Combination>,
    {
        let mut table = Self::new();
        for row in rows {
            table.insert(row.borrow());
        }
        table
    }

    /// Insert a single row. Returns `false` if the row was skipped.
    pub fn insert(&mut self, row: &Combination) -> bool {
        let Some((child, parent1, parent2)) = row.trimmed() else {
            self.record_skipped();
            return false;
        };

        self.forward
            .entry(parent1.to_string())
            .or_default()
            .insert(parent2.to_string(), child.to_string());
        self.forward
            .entry(parent2.to_string())
            .or_default()
            .insert(parent1.to_string(), child.to_string());

        self.reverse
            .entry(child.to_string())
            .or_default()
            .push(ParentPair::new(parent1, parent2));

        for name in [child, parent1, parent2] {
            if !self.names.contains(name) {
                self.names.insert(name.to_string());
            }
        }

        true
    }

    /// Count a row the reader could not decode at all.
    pub(crate) fn record_skipped(&mut self) {
        self.skipped_rows = self.skipped_rows.saturating_add(1);
    }

    // =========================================================================
    // LOOKUP
    // =========================================================================

    /// Find the child of two parents. Both names are normalized first.
    #[must_use]
    pub fn lookup_child(&self, parent_a: &str, parent_b: &str) -> Option<&str> {
        self.lookup_exact(self.normalize(parent_a), self.normalize(parent_b))
    }

    /// Find the child of two parents without normalizing the names.
    #[must_use]
    pub fn lookup_exact(&self, parent_a: &str, parent_b: &str) -> Option<&str> {
        self.forward
            .get(parent_a)?
            .get(parent_b)
            .map(String::as_str)
    }

    /// Every `(partner, child)` that `parent` can be bred into, ordered by
    /// partner name.
    pub fn partners<'a>(&'a self, parent: &str) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        self.forward
            .get(parent)
            .into_iter()
            .flat_map(|partners| partners.iter().map(|(p, c)| (p.as_str(), c.as_str())))
    }

    /// All recorded parent pairs for `child`, in insertion order.
    #[must_use]
    pub fn parents_of(&self, child: &str) -> &[ParentPair] {
        self.reverse
            .get(self.normalize(child))
            .map_or(&[], Vec::as_slice)
    }

    // =========================================================================
    // NAMES
    // =========================================================================

    /// Resolve `name` to the best matching known name.
    ///
    /// - An exact match wins
    /// - Otherwise the first known name (alphabetically) that matches
    ///   case-insensitively
    /// - Otherwise `name` itself, which matches nothing downstream
    #[must_use]
    pub fn normalize<'a>(&'a self, name: &'a str) -> &'a str {
        self.resolve(name).unwrap_or(name)
    }

    /// Like [`CombinationTable::normalize`], but `None` for unknown names.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<&str> {
        if let Some(known) = self.names.get(name) {
            return Some(known.as_str());
        }

        let lowered = name.to_lowercase();
        self.names
            .iter()
            .find(|known| known.to_lowercase() == lowered)
            .map(String::as_str)
    }

    /// Check if `name` is a known creature (exact match).
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Known names that contain the query, or are contained by it,
    /// ignoring case. Alphabetical, at most `limit` entries.
    #[must_use]
    pub fn similar_names(&self, name: &str, limit: usize) -> Vec<String> {
        let lowered = name.to_lowercase();
        self.names
            .iter()
            .filter(|known| {
                let known = known.to_lowercase();
                known.contains(&lowered) || lowered.contains(&known)
            })
            .take(limit)
            .cloned()
            .collect()
    }

    /// All known names in alphabetical order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Distinct children, alphabetical.
    pub fn children(&self) -> impl Iterator<Item = &str> {
        self.reverse.keys().map(String::as_str)
    }

    /// Distinct parents, alphabetical.
    pub fn parents(&self) -> impl Iterator<Item = &str> {
        self.forward.keys().map(String::as_str)
    }

    // =========================================================================
    // STATISTICS
    // =========================================================================

    /// Number of known creatures.
    #[must_use]
    pub fn pal_count(&self) -> usize {
        self.names.len()
    }

    /// Number of distinct unordered parent pairs.
    #[must_use]
    pub fn combination_count(&self) -> usize {
        self.forward
            .iter()
            .map(|(parent, partners)| {
                partners
                    .keys()
                    .filter(|partner| parent.as_str() <= partner.as_str())
                    .count()
            })
            .sum()
    }

    /// Number of rows skipped during construction.
    #[must_use]
    pub fn skipped_rows(&self) -> usize {
        self.skipped_rows
    }

    /// All counters at once.
    #[must_use]
    pub fn stats(&self) -> TableStats {
        TableStats {
            pal_count: self.pal_count(),
            combination_count: self.combination_count(),
            skipped_rows: self.skipped_rows,
        }
    }

    /// Check if the table holds no combination at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }
}

// =============================================================================
// TESTS
// =============================================================================
