//! Span containment and ordering checks over a built tree.
//!
//! Every node must have a non-empty range that lies inside the range of its
//! nearest checked ancestor, and the nodes of each [`ChildRun`] must appear
//! in increasing, non-overlapping order. Nodes whose range carries the `-1`
//! sentinel (an empty parameter list) are not checked themselves; their
//! children are checked against the ancestor above them.
//!
//! The walk keeps its own ancestor stack, so arbitrarily deep trees do not
//! recurse.

use std::fmt;

use thiserror::Error;

use crate::sst::ChildRun;
use crate::{NodeId, SstArena};

/// Which rule a [`SpanViolation`] broke.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ViolationKind {
    /// A node is empty or sticks out of its parent.
    Containment,
    /// Two siblings are out of order or share text.
    Overlap,
}

/// A node together with the label it had when the violation was found.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Labeled {
    pub id: NodeId,
    pub label: String,
}

impl Labeled {
    fn new(arena: &SstArena, id: NodeId) -> Self {
        Labeled {
            id,
            label: arena.describe(id),
        }
    }
}

impl fmt::Display for Labeled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// First broken span invariant found by [`check_spans`].
#[derive(Clone, Eq, PartialEq, Debug, Error)]
pub enum SpanViolation {
    #[error("Subnode {node} doesn't fit in parent node {parent}.")]
    Containment { parent: Labeled, node: Labeled },
    #[error("In {parent} are overlapping {what}: {previous} and {node}")]
    Overlap {
        parent: Labeled,
        what: &'static str,
        previous: Labeled,
        node: Labeled,
    },
}

impl SpanViolation {
    pub fn kind(&self) -> ViolationKind {
        match self {
            SpanViolation::Containment { .. } => ViolationKind::Containment,
            SpanViolation::Overlap { .. } => ViolationKind::Overlap,
        }
    }

    /// The two nodes at fault: `(parent, node)` or `(previous, node)`.
    pub fn nodes(&self) -> (NodeId, NodeId) {
        match self {
            SpanViolation::Containment { parent, node } => (parent.id, node.id),
            SpanViolation::Overlap { previous, node, .. } => (previous.id, node.id),
        }
    }
}

struct Frame {
    node: NodeId,
    /// Nearest ancestor whose range is checked against.
    outer: Option<NodeId>,
}

/// Check the subtree rooted at `root`.
///
/// The root itself is only used as the outer range of its children.
pub fn check_spans(arena: &SstArena, root: NodeId) -> Result<(), SpanViolation> {
    let mut stack = vec![Frame {
        node: root,
        outer: None,
    }];

    while let Some(Frame { node, outer }) = stack.pop() {
        let range = arena.range(node);
        let checked = !range.has_sentinel();

        if checked {
            if let Some(outer) = outer {
                let outer_range = arena.range(outer);
                if outer_range.is_empty() || range.is_empty() || !outer_range.contains(&range) {
                    return Err(SpanViolation::Containment {
                        parent: Labeled::new(arena, outer),
                        node: Labeled::new(arena, node),
                    });
                }
            }
        }

        let runs = arena.child_runs(node);
        for run in &runs {
            check_order(arena, node, run)?;
        }

        let next_outer = if checked { Some(node) } else { outer };
        let pushed = stack.len();
        stack.extend(runs.iter().flat_map(|run| run.nodes.iter()).map(|&child| Frame {
            node: child,
            outer: next_outer,
        }));
        // Visit children in source order.
        stack[pushed..].reverse();
    }
    Ok(())
}

fn check_order(arena: &SstArena, parent: NodeId, run: &ChildRun) -> Result<(), SpanViolation> {
    let mut previous: Option<NodeId> = None;
    for &node in &run.nodes {
        if arena.range(node).has_sentinel() {
            continue;
        }
        if let Some(prev) = previous {
            if arena.range(prev).overlaps_start_of(&arena.range(node)) {
                return Err(SpanViolation::Overlap {
                    parent: Labeled::new(arena, parent),
                    what: run.what,
                    previous: Labeled::new(arena, prev),
                    node: Labeled::new(arena, node),
                });
            }
        }
        previous = Some(node);
    }
    Ok(())
}
