//! # Result Shaping
//!
//! Converts the flat list of shortest paths into a collapsible tree.
//!
//! Paths are first turned into [`StructuredPath`]s: a `start` step followed by
//! `breed` steps. The tree then groups paths that share an exact step prefix:
//!
//! ```text
//! single  Lamball -> Lamball + Cattiva = Direhowl -> ...
//! group   [Lamball, Lamball + Foxparks = Rooby]  (3 paths)
//!   ├── single ...
//!   └── group  ...
//! ```
//!
//! Grouping is purely structural: two steps belong together only if they are
//! equal field by field. Siblings are ordered by step content, so identical
//! input always produces the identical tree.

use crate::types::{BreedingPath, ParentPair};
use serde::{Deserialize, Serialize};

// =============================================================================
// STRUCTURED PATHS
// =============================================================================

/// One position of a structured path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PathStep {
    /// The creature the path starts from. Always position 0.
    Start { pal: String, step_number: usize },

    /// A breeding step.
    Breed {
        parents: ParentPair,
        result: String,
        step_number: usize,
        /// True if `result` is the searched target.
        is_final: bool,
    },
}

/// A numbered path in presentation form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredPath {
    /// Position of the path in the search result.
    pub id: usize,
    pub steps: Vec<PathStep>,
    /// Number of breeding steps.
    pub total_steps: usize,
}

impl StructuredPath {
    /// Convert a search path, flagging steps that produce `target`.
    #[must_use]
    pub fn from_path(id: usize, path: &BreedingPath, target: &str) -> Self {
        let start = PathStep::Start {
            pal: path.start().to_string(),
            step_number: 0,
        };
        let breeds = path.steps().iter().enumerate().map(|(i, step)| PathStep::Breed {
            parents: ParentPair::new(&step.parent_a, &step.parent_b),
            result: step.result.clone(),
            step_number: i.saturating_add(1),
            is_final: step.result == target,
        });

        Self {
            id,
            steps: std::iter::once(start).chain(breeds).collect(),
            total_steps: path.step_count(),
        }
    }
}

/// Convert every path of a search result, numbering them in order.
#[must_use]
pub fn structure_paths(paths: &[BreedingPath], target: &str) -> Vec<StructuredPath> {
    paths
        .iter()
        .enumerate()
        .map(|(id, path)| StructuredPath::from_path(id, path, target))
        .collect()
}

// =============================================================================
// GROUP TREE
// =============================================================================

/// A node of the group tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PathNode {
    /// One concrete path.
    Single { path: StructuredPath },

    /// Two or more paths sharing `common_steps`.
    Group {
        common_steps: Vec<PathStep>,
        children: Vec<PathNode>,
        count: usize,
    },
}

impl PathNode {
    /// Number of paths under this node.
    #[must_use]
    pub fn count(&self) -> usize {
        match self {
            Self::Single { .. } => 1,
            Self::Group { count, .. } => *count,
        }
    }

    #[must_use]
    pub fn is_group(&self) -> bool {
        matches!(self, Self::Group { .. })
    }
}

/// Sort key of a path at one depth: exhausted < start < breed.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum StepKey<'a> {
    Exhausted,
    Start(&'a str),
    Breed(&'a str, &'a str, &'a str),
}

impl<'a> StepKey<'a> {
    fn of(step: Option<&'a PathStep>) -> Self {
        match step {
            None => Self::Exhausted,
            Some(PathStep::Start { pal, .. }) => Self::Start(pal),
            Some(PathStep::Breed {
                parents, result, ..
            }) => Self::Breed(&parents.parent1, &parents.parent2, result),
        }
    }
}

/// How one set of paths splits at one depth.
enum Partition {
    Leaf(usize),
    Group(Vec<usize>),
}

/// Split `members` (indices into `paths`) by their step at `depth`.
fn partition(paths: &[StructuredPath], mut members: Vec<usize>, depth: usize) -> Vec<Partition> {
    if members.len() <= 1 {
        return members.into_iter().map(Partition::Leaf).collect();
    }

    let step_at = |index: usize| paths.get(index).and_then(|p| p.steps.get(depth));
    members.sort_by(|&a, &b| StepKey::of(step_at(a)).cmp(&StepKey::of(step_at(b))));

    let mut parts = Vec::new();
    let mut run: Vec<usize> = Vec::new();

    for index in members {
        let Some(step) = step_at(index) else {
            parts.push(Partition::Leaf(index));
            continue;
        };
        let continues_run = run
            .last()
            .is_some_and(|&prev| step_at(prev) == Some(step));
        if !continues_run {
            flush(&mut parts, &mut run);
        }
        run.push(index);
    }
    flush(&mut parts, &mut run);

    parts
}

fn flush(parts: &mut Vec<Partition>, run: &mut Vec<usize>) {
    match run.len() {
        0 => {}
        1 => parts.push(Partition::Leaf(run[0])),
        _ => parts.push(Partition::Group(std::mem::take(run))),
    }
    run.clear();
}

/// A tree node before its children are materialized.
enum Draft {
    Single(usize),
    Group {
        /// Path the common prefix is copied from.
        exemplar: usize,
        depth: usize,
        count: usize,
        children: Vec<usize>,
    },
}

/// Pending split: `members` at `depth`, attached under draft `parent`.
struct Frame {
    parent: Option<usize>,
    members: Vec<usize>,
    depth: usize,
}

/// Group paths by common step prefix.
///
/// Built with an explicit work stack. Every draft is created after its
/// parent, so materializing drafts in reverse creation order always finds
/// the children already built.
///
/// If every top-level node ends up a group, the overall shortest path (first
/// in input order on ties) is also placed as a single at the front of the top
/// level. That path then appears twice in the tree. Nested groups are never
/// promoted into, so the top level holds the only duplicate.
#[must_use]
pub fn group_paths(paths: &[StructuredPath]) -> Vec<PathNode> {
    let mut drafts: Vec<Draft> = Vec::new();
    let mut roots: Vec<usize> = Vec::new();
    let mut stack = vec![Frame {
        parent: None,
        members: (0..paths.len()).collect(),
        depth: 0,
    }];

    while let Some(frame) = stack.pop() {
        for part in partition(paths, frame.members, frame.depth) {
            let id = drafts.len();
            match part {
                Partition::Leaf(index) => drafts.push(Draft::Single(index)),
                Partition::Group(members) => {
                    drafts.push(Draft::Group {
                        exemplar: members[0],
                        depth: frame.depth,
                        count: members.len(),
                        children: Vec::new(),
                    });
                    stack.push(Frame {
                        parent: Some(id),
                        members,
                        depth: frame.depth.saturating_add(1),
                    });
                }
            }

            match frame.parent {
                None => roots.push(id),
                Some(parent) => {
                    if let Some(Draft::Group { children, .. }) = drafts.get_mut(parent) {
                        children.push(id);
                    }
                }
            }
        }
    }

    let mut built: Vec<Option<PathNode>> = Vec::new();
    built.resize_with(drafts.len(), || None);

    for (id, draft) in drafts.into_iter().enumerate().rev() {
        let node = match draft {
            Draft::Single(index) => PathNode::Single {
                path: paths[index].clone(),
            },
            Draft::Group {
                exemplar,
                depth,
                count,
                children,
            } => PathNode::Group {
                common_steps: paths[exemplar]
                    .steps
                    .get(..=depth)
                    .map(<[PathStep]>::to_vec)
                    .unwrap_or_default(),
                children: children
                    .into_iter()
                    .filter_map(|child| built[child].take())
                    .collect(),
                count,
            },
        };
        built[id] = Some(node);
    }

    let mut nodes: Vec<PathNode> = roots
        .into_iter()
        .filter_map(|root| built[root].take())
        .collect();

    if !nodes.is_empty() && nodes.iter().all(PathNode::is_group) {
        if let Some(shortest) = paths.iter().min_by_key(|p| p.total_steps) {
            nodes.insert(
                0,
                PathNode::Single {
                    path: shortest.clone(),
                },
            );
        }
    }

    nodes
}

/// Every single path in the tree, in depth-first tree order.
#[must_use]
pub fn leaves(nodes: &[PathNode]) -> Vec<&StructuredPath> {
    let mut out = Vec::new();
    let mut stack: Vec<&PathNode> = nodes.iter().rev().collect();

    while let Some(node) = stack.pop() {
        match node {
            PathNode::Single { path } => out.push(path),
            PathNode::Group { children, .. } => stack.extend(children.iter().rev()),
        }
    }

    out
}

// =============================================================================
// TESTS
// =============================================================================
