//! # Property-Based Tests
//!
//! Randomized tables checked against the engine's invariants.
//!
//! These tests ensure determinism and shortest-path correctness.

#![allow(clippy::unwrap_used, clippy::panic)]

use palbreed_core::{
    Combination, CombinationTable, PathFinder, PathNode, SearchLimits, group_paths, leaves,
    structure_paths,
};
use proptest::collection::vec;
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet, VecDeque};

// =============================================================================
// HELPERS
// =============================================================================

/// Name pool small enough that random rows form dense graphs.
const NAMES: [&str; 8] = [
    "Anubis", "Cattiva", "Chikipi", "Direhowl", "Foxparks", "Lamball", "Rooby", "Vixy",
];

fn name(index: usize) -> &'static str {
    NAMES[index % NAMES.len()]
}

fn rows_strategy() -> impl Strategy<Value = Vec<Combination>> {
    vec((0usize..8, 0usize..8, 0usize..8), 1..40).prop_map(|rows| {
        rows.into_iter()
            .map(|(c, a, b)| Combination::new(name(c), name(a), name(b)))
            .collect()
    })
}

/// Plain BFS distance over the same edge rule as the engine:
/// `current -> child` for every partner other than `current` itself.
fn reference_distance(table: &CombinationTable, start: &str, target: &str) -> Option<usize> {
    let mut dist: BTreeMap<&str, usize> = BTreeMap::from([(start, 0)]);
    let mut queue = VecDeque::from([start]);

    while let Some(current) = queue.pop_front() {
        let depth = dist[current];
        if current == target {
            return Some(depth);
        }
        for (partner, child) in table.partners(current) {
            if partner != current && !dist.contains_key(child) {
                dist.insert(child, depth + 1);
                queue.push_back(child);
            }
        }
    }
    None
}

fn count_tree(node: &PathNode) -> usize {
    match node {
        PathNode::Single { .. } => 1,
        PathNode::Group { children, .. } => children.iter().map(count_tree).sum(),
    }
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// Lookup gives the same child for both parent orders.
    #[test]
    fn lookup_is_symmetric(rows in rows_strategy(), a in 0usize..8, b in 0usize..8) {
        let table = CombinationTable::build(&rows);
        prop_assert_eq!(
            table.lookup_child(name(a), name(b)),
            table.lookup_child(name(b), name(a))
        );
    }

    /// The last row for a pair decides its child.
    #[test]
    fn last_row_wins(rows in rows_strategy()) {
        let table = CombinationTable::build(&rows);
        let mut expected: BTreeMap<(&str, &str), &str> = BTreeMap::new();
        for row in &rows {
            let (a, b) = (row.parent1.as_str(), row.parent2.as_str());
            expected.insert((a, b), row.child.as_str());
            expected.insert((b, a), row.child.as_str());
        }
        for ((a, b), child) in expected {
            prop_assert_eq!(table.lookup_child(a, b), Some(child));
        }
    }

    /// Start equal to target always yields exactly the trivial path.
    #[test]
    fn same_start_and_target_is_trivial(rows in rows_strategy(), pick in 0usize..40) {
        let table = CombinationTable::build(&rows);
        let names: Vec<&str> = table.names().collect();
        let chosen = names[pick % names.len()];

        let result = PathFinder::new(&table)
            .find_shortest_paths(chosen, chosen, SearchLimits::default())
            .unwrap();
        prop_assert_eq!(result.paths.len(), 1);
        prop_assert_eq!(result.paths[0].step_count(), 0);
    }

    /// Found paths are minimal, equally long, simple, and well chained.
    #[test]
    fn paths_are_shortest_and_simple(
        rows in rows_strategy(),
        s in 0usize..8,
        t in 0usize..8,
    ) {
        let table = CombinationTable::build(&rows);
        let (start, target) = (name(s), name(t));
        prop_assume!(table.contains(start) && table.contains(target) && start != target);

        let result = PathFinder::new(&table)
            .find_shortest_paths(start, target, SearchLimits::unbounded())
            .unwrap();
        let expected = reference_distance(&table, start, target);

        prop_assert_eq!(result.min_steps(), expected);
        prop_assert!(!result.truncated);

        for path in &result.paths {
            prop_assert_eq!(Some(path.step_count()), expected);
            prop_assert_eq!(path.start(), start);
            prop_assert_eq!(path.end(), target);

            let names: Vec<&str> = path.names().collect();
            let distinct: BTreeSet<&str> = names.iter().copied().collect();
            prop_assert_eq!(distinct.len(), names.len());

            let mut current = start;
            for step in path.steps() {
                prop_assert_eq!(step.parent_a.as_str(), current);
                prop_assert_ne!(step.parent_b.as_str(), current);
                prop_assert_eq!(
                    table.lookup_exact(&step.parent_a, &step.parent_b),
                    Some(step.result.as_str())
                );
                current = step.result.as_str();
            }
        }
    }

    /// The path cap is never exceeded.
    #[test]
    fn path_cap_respected(
        rows in rows_strategy(),
        s in 0usize..8,
        t in 0usize..8,
        cap in 1usize..4,
    ) {
        let table = CombinationTable::build(&rows);
        let (start, target) = (name(s), name(t));
        prop_assume!(table.contains(start) && table.contains(target));

        let result = PathFinder::new(&table)
            .find_shortest_paths(start, target, SearchLimits::new(cap, None))
            .unwrap();
        prop_assert!(result.paths.len() <= cap);
    }

    /// Every path appears in the tree, and group counts are consistent.
    #[test]
    fn grouping_preserves_paths(
        rows in rows_strategy(),
        s in 0usize..8,
        t in 0usize..8,
    ) {
        let table = CombinationTable::build(&rows);
        let (start, target) = (name(s), name(t));
        prop_assume!(table.contains(start) && table.contains(target));

        let result = PathFinder::new(&table)
            .find_shortest_paths(start, target, SearchLimits::unbounded())
            .unwrap();
        let structured = structure_paths(&result.paths, &result.target);
        let nodes = group_paths(&structured);

        // Multiset equality: each path once, plus the promoted shortest path
        // when it heads a top level of groups.
        let mut expected: Vec<usize> = (0..structured.len()).collect();
        if let [PathNode::Single { path }, rest @ ..] = nodes.as_slice() {
            if !rest.is_empty() && rest.iter().all(PathNode::is_group) {
                let shortest = structured.iter().map(|p| p.total_steps).min();
                prop_assert_eq!(Some(path.total_steps), shortest);
                expected.push(path.id);
            }
        }
        expected.sort_unstable();

        let mut tree_ids: Vec<usize> = leaves(&nodes).iter().map(|p| p.id).collect();
        tree_ids.sort_unstable();
        prop_assert_eq!(tree_ids, expected);

        for node in &nodes {
            prop_assert_eq!(node.count(), count_tree(node));
        }
    }

    /// Identical input produces identical output.
    #[test]
    fn search_is_deterministic(rows in rows_strategy(), s in 0usize..8, t in 0usize..8) {
        let run = || {
            let table = CombinationTable::build(&rows);
            let result = PathFinder::new(&table)
                .find_shortest_paths(name(s), name(t), SearchLimits::unbounded());
            result.map(|search| group_paths(&structure_paths(&search.paths, &search.target)))
        };
        prop_assert_eq!(run(), run());
    }
}
