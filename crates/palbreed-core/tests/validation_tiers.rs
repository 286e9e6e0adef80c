//! # Validation Tier Tests (T0-T4)
//!
//! If ANY tier fails, the engine is INVALID.
//!
//! ## Tiers
//! - T0: Table Integrity
//! - T1: Combination Lookup
//! - T2: Shortest-Path Search
//! - T3: Result Grouping
//! - T4: End-to-End Queries

#![allow(clippy::unwrap_used, clippy::panic)]

use palbreed_core::{
    BreedStep, BreedingPath, Combination, CombinationTable, NameSide, PalBreedError, PathFinder,
    PathNode, PathStep, PathsResponse, Query, QueryResponse, SearchFailure, SearchLimits,
    group_paths, leaves, load_table, read_table, structure_paths,
};
use std::io::Write;
use std::time::Duration;

/// A small slice of the game's breeding table.
///
/// ```text
/// Lamball + Lamball   = Cattiva
/// Lamball + Cattiva   = Direhowl
/// Lamball + Foxparks  = Rooby
/// Cattiva + Foxparks  = Rooby
/// Direhowl + Foxparks = Anubis
/// Rooby + Chikipi     = Anubis
/// Cattiva + Chikipi   = Foxparks
/// ```
const FIXTURE_CSV: &str = "\
child,parent1,parent2
Cattiva,Lamball,Lamball
Direhowl,Lamball,Cattiva
Rooby,Lamball,Foxparks
Rooby,Cattiva,Foxparks
Anubis,Direhowl,Foxparks
Anubis,Rooby,Chikipi
Foxparks,Cattiva,Chikipi
";

fn fixture() -> CombinationTable {
    read_table(FIXTURE_CSV.as_bytes()).unwrap()
}

// =============================================================================
// TIER T0: TABLE INTEGRITY
// =============================================================================

mod t0_table_integrity {
    use super::*;

    /// T0.1: Every well-formed row is indexed.
    #[test]
    fn all_rows_indexed() {
        let table = fixture();
        assert_eq!(table.combination_count(), 7);
        assert_eq!(table.pal_count(), 7);
        assert_eq!(table.skipped_rows(), 0);
    }

    /// T0.2: Blank fields skip the row, other rows survive.
    #[test]
    fn blank_rows_skipped() {
        let data = "child,parent1,parent2\n,Lamball,Lamball\nDirehowl,Lamball,Cattiva\nRooby, ,Foxparks\n";
        let table = read_table(data.as_bytes()).unwrap();

        assert_eq!(table.skipped_rows(), 2);
        assert_eq!(table.combination_count(), 1);
        assert_eq!(table.lookup_child("Lamball", "Cattiva"), Some("Direhowl"));
    }

    /// T0.3: Short records are skipped, not fatal.
    #[test]
    fn short_record_skipped() {
        let data = "child,parent1,parent2\nDirehowl,Lamball\nCattiva,Lamball,Lamball\n";
        let table = read_table(data.as_bytes()).unwrap();

        assert_eq!(table.skipped_rows(), 1);
        assert_eq!(table.lookup_child("Lamball", "Lamball"), Some("Cattiva"));
    }

    /// T0.4: A header without the required columns is rejected.
    #[test]
    fn missing_columns_rejected() {
        let data = "name,parent1\nLamball,Cattiva\n";
        let result = read_table(data.as_bytes());
        assert!(matches!(result, Err(PalBreedError::Csv(msg)) if msg.contains("child")));
    }

    /// T0.5: Missing data source is a distinct error.
    #[test]
    fn missing_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_table(&dir.path().join("nope.csv"));
        assert!(matches!(result, Err(PalBreedError::DataSourceMissing(_))));
    }

    /// T0.6: Tables load from disk.
    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(FIXTURE_CSV.as_bytes()).unwrap();

        let table = load_table(file.path()).unwrap();
        assert_eq!(table.combination_count(), 7);
    }

    /// T0.7: Header-only input builds an empty table.
    #[test]
    fn header_only_is_empty() {
        let table = read_table("child,parent1,parent2\n".as_bytes()).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.pal_count(), 0);
    }
}

// =============================================================================
// TIER T1: COMBINATION LOOKUP
// =============================================================================

mod t1_lookup {
    use super::*;

    /// T1.1: Lookup is symmetric in its parents.
    #[test]
    fn symmetric() {
        let table = fixture();
        for (a, b) in [("Lamball", "Cattiva"), ("Rooby", "Chikipi"), ("Cattiva", "Chikipi")] {
            assert_eq!(table.lookup_child(a, b), table.lookup_child(b, a));
            assert!(table.lookup_child(a, b).is_some());
        }
    }

    /// T1.2: Self-breeding pairs are ordinary lookups.
    #[test]
    fn self_pair() {
        assert_eq!(fixture().lookup_child("Lamball", "Lamball"), Some("Cattiva"));
    }

    /// T1.3: Unlisted pairs and unknown names have no child.
    #[test]
    fn absent() {
        let table = fixture();
        assert_eq!(table.lookup_child("Anubis", "Anubis"), None);
        assert_eq!(table.lookup_child("Lamball", "Nobody"), None);
    }

    /// T1.4: Case-insensitive names resolve before lookup.
    #[test]
    fn case_insensitive() {
        assert_eq!(fixture().lookup_child("DIREHOWL", "foxparks"), Some("Anubis"));
    }

    /// T1.5: Reverse lookup lists every recorded pair.
    #[test]
    fn parents_of() {
        let table = fixture();
        let parents = table.parents_of("Anubis");
        assert_eq!(parents.len(), 2);
        assert_eq!(parents[0].parent1, "Direhowl");
        assert_eq!(parents[1].parent1, "Rooby");
    }
}

// =============================================================================
// TIER T2: SHORTEST-PATH SEARCH
// =============================================================================

mod t2_search {
    use super::*;

    fn search(start: &str, target: &str, limits: SearchLimits) -> Vec<BreedingPath> {
        let table = fixture();
        PathFinder::new(&table)
            .find_shortest_paths(start, target, limits)
            .unwrap()
            .paths
    }

    /// T2.1: One-step chains.
    #[test]
    fn single_step() {
        let paths = search("Lamball", "Direhowl", SearchLimits::default());
        assert_eq!(
            paths,
            vec![BreedingPath::from_steps(
                "Lamball",
                vec![BreedStep::new("Lamball", "Cattiva", "Direhowl")]
            )]
        );
    }

    /// T2.2: All shortest two-step chains, in discovery order.
    #[test]
    fn two_steps_all_routes() {
        let paths = search("Lamball", "Anubis", SearchLimits::default());

        // Lamball's partners in order: Cattiva -> Direhowl, Foxparks -> Rooby.
        // Lamball + Lamball is skipped (partner equals the current node).
        assert_eq!(
            paths,
            vec![
                BreedingPath::from_steps(
                    "Lamball",
                    vec![
                        BreedStep::new("Lamball", "Cattiva", "Direhowl"),
                        BreedStep::new("Direhowl", "Foxparks", "Anubis"),
                    ]
                ),
                BreedingPath::from_steps(
                    "Lamball",
                    vec![
                        BreedStep::new("Lamball", "Foxparks", "Rooby"),
                        BreedStep::new("Rooby", "Chikipi", "Anubis"),
                    ]
                ),
            ]
        );
    }

    /// T2.3: Every returned path has the same step count.
    #[test]
    fn equal_lengths() {
        for (start, target) in [("Lamball", "Anubis"), ("Cattiva", "Anubis"), ("Chikipi", "Anubis")] {
            let paths = search(start, target, SearchLimits::unbounded());
            assert!(!paths.is_empty(), "{start} -> {target}");
            let first = paths[0].step_count();
            assert!(paths.iter().all(|p| p.step_count() == first));
        }
    }

    /// T2.4: No chain revisits a creature.
    #[test]
    fn chains_are_simple() {
        for path in search("Cattiva", "Anubis", SearchLimits::unbounded()) {
            let mut names: Vec<_> = path.names().collect();
            let before = names.len();
            names.sort_unstable();
            names.dedup();
            assert_eq!(names.len(), before, "{path}");
        }
    }

    /// T2.5: Start equal to target is the trivial path.
    #[test]
    fn trivial() {
        assert_eq!(
            search("rooby", "Rooby", SearchLimits::default()),
            vec![BreedingPath::trivial("Rooby")]
        );
    }

    /// T2.6: Unreachable targets yield an empty, untruncated result.
    #[test]
    fn unreachable() {
        let table = fixture();
        let result = PathFinder::new(&table)
            .find_shortest_paths("Anubis", "Lamball", SearchLimits::default())
            .unwrap();
        assert!(result.is_empty());
        assert!(!result.truncated);
    }

    /// T2.7: Unknown names are reported per side.
    #[test]
    fn unknown_names() {
        let table = fixture();
        let finder = PathFinder::new(&table);

        let cases = [
            ("Nobody", "Anubis", NameSide::Start),
            ("Lamball", "Nobody", NameSide::Target),
            ("Nobody", "Noone", NameSide::Both),
        ];
        for (start, target, expected) in cases {
            let result = finder.find_shortest_paths(start, target, SearchLimits::default());
            assert!(
                matches!(result, Err(SearchFailure::UnknownName { side, .. }) if side == expected)
            );
        }
    }

    /// T2.8: The path cap bounds the result and marks it truncated.
    #[test]
    fn path_cap() {
        let table = fixture();
        let result = PathFinder::new(&table)
            .find_shortest_paths("Lamball", "Anubis", SearchLimits::new(1, None))
            .unwrap();
        assert_eq!(result.paths.len(), 1);
        assert!(result.truncated);
    }

    /// T2.9: An exhausted time budget stops the search.
    #[test]
    fn time_budget() {
        let table = fixture();
        let result = PathFinder::new(&table)
            .find_shortest_paths(
                "Lamball",
                "Anubis",
                SearchLimits::new(0, Some(Duration::ZERO)),
            )
            .unwrap();
        assert!(result.is_empty());
        assert!(result.truncated);
    }
}

// =============================================================================
// TIER T3: RESULT GROUPING
// =============================================================================

mod t3_grouping {
    use super::*;

    /// T3.1: Paths sharing only the start are grouped, with the shortest
    /// promoted to the top level.
    #[test]
    fn shared_start_grouped() {
        let table = fixture();
        let search = PathFinder::new(&table)
            .find_shortest_paths("Lamball", "Anubis", SearchLimits::default())
            .unwrap();
        let structured = structure_paths(&search.paths, &search.target);
        let nodes = group_paths(&structured);

        assert_eq!(nodes.len(), 2);
        assert!(matches!(&nodes[0], PathNode::Single { path } if path.id == 0));
        let PathNode::Group {
            common_steps,
            count,
            children,
        } = &nodes[1]
        else {
            panic!("expected a group");
        };
        assert_eq!(*count, 2);
        assert_eq!(children.len(), 2);
        assert_eq!(
            common_steps,
            &vec![PathStep::Start {
                pal: "Lamball".into(),
                step_number: 0
            }]
        );
    }

    /// T3.2: Final steps are flagged.
    #[test]
    fn final_steps_flagged() {
        let path = BreedingPath::from_steps(
            "Lamball",
            vec![
                BreedStep::new("Lamball", "Cattiva", "Direhowl"),
                BreedStep::new("Direhowl", "Foxparks", "Anubis"),
            ],
        );
        let structured = structure_paths(&[path], "Anubis");
        let finals: Vec<bool> = structured[0]
            .steps
            .iter()
            .filter_map(|step| match step {
                PathStep::Breed { is_final, .. } => Some(*is_final),
                PathStep::Start { .. } => None,
            })
            .collect();
        assert_eq!(finals, vec![false, true]);
    }

    /// T3.3: Group counts equal the number of leaves beneath them.
    #[test]
    fn counts_match_leaves() {
        let table = fixture();
        let search = PathFinder::new(&table)
            .find_shortest_paths("Cattiva", "Anubis", SearchLimits::unbounded())
            .unwrap();
        let nodes = group_paths(&structure_paths(&search.paths, &search.target));

        fn check(node: &PathNode) -> usize {
            match node {
                PathNode::Single { .. } => 1,
                PathNode::Group {
                    children, count, ..
                } => {
                    let sum: usize = children.iter().map(check).sum();
                    assert_eq!(sum, *count);
                    sum
                }
            }
        }
        for node in &nodes {
            check(node);
        }
        assert!(leaves(&nodes).len() >= search.paths.len());
    }
}

// =============================================================================
// TIER T4: END-TO-END QUERIES
// =============================================================================

mod t4_queries {
    use super::*;

    /// T4.1: Lookup query through the dispatcher.
    #[test]
    fn lookup_query() {
        let query = Query::from_parts(Some("Lamball"), Some("Cattiva"), None, SearchLimits::default())
            .unwrap();
        let QueryResponse::Lookup(response) = query.execute(&fixture()) else {
            panic!("expected a lookup response");
        };
        assert!(response.success);
        assert_eq!(response.child.as_deref(), Some("Direhowl"));
    }

    /// T4.2: Path query through the dispatcher.
    #[test]
    fn path_query() {
        let query =
            Query::from_parts(None, Some("lamball"), Some("anubis"), SearchLimits::default())
                .unwrap();
        let QueryResponse::Paths(PathsResponse::Found(found)) = query.execute(&fixture()) else {
            panic!("expected paths");
        };
        assert_eq!(found.start, "Lamball");
        assert_eq!(found.target, "Anubis");
        assert_eq!(found.total_paths, 2);
        assert_eq!(found.min_steps, 2);
        assert!(!found.truncated);
    }

    /// T4.3: Failed path queries serialize with suggestions.
    #[test]
    fn failed_query_serializes() {
        let query = Query::find_paths("Lamball", "Anubi", SearchLimits::default());
        let json = serde_json::to_value(query.execute(&fixture())).unwrap();

        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Unknown target Pal: Anubi");
        assert_eq!(json["suggestions"]["target"][0], "Anubis");
        assert_eq!(json["suggestions"]["start"].as_array().map(Vec::len), Some(0));
    }

    /// T4.4: Found responses serialize the tree with tagged nodes.
    #[test]
    fn found_query_serializes() {
        let query = Query::find_paths("Lamball", "Direhowl", SearchLimits::default());
        let json = serde_json::to_value(query.execute(&fixture())).unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["total_paths"], 1);
        assert_eq!(json["paths"][0]["type"], "single");
        assert_eq!(json["paths"][0]["path"]["steps"][0]["type"], "start");
        assert_eq!(json["paths"][0]["path"]["steps"][1]["is_final"], true);
    }

    /// T4.5: Identical input gives identical serialized output.
    #[test]
    fn deterministic_output() {
        let run = || {
            let table = fixture();
            let response = Query::find_paths("Cattiva", "Anubis", SearchLimits::unbounded())
                .execute(&table);
            serde_json::to_string(&response).unwrap()
        };
        assert_eq!(run(), run());
    }

    /// T4.6: Rows built in memory behave like parsed rows.
    #[test]
    fn built_table_matches_parsed() {
        let rows = [
            Combination::new("Cattiva", "Lamball", "Lamball"),
            Combination::new("Direhowl", "Lamball", "Cattiva"),
        ];
        let table = CombinationTable::build(&rows);
        let parsed =
            read_table("child,parent1,parent2\nCattiva,Lamball,Lamball\nDirehowl,Lamball,Cattiva\n".as_bytes())
                .unwrap();

        assert_eq!(table.stats(), parsed.stats());
        assert_eq!(
            table.lookup_child("Cattiva", "Lamball"),
            parsed.lookup_child("Cattiva", "Lamball")
        );
    }
}
