//! Reference answers computed by plain graph search

use dataflow_core::features::points_to::{PSNodeId, PointerGraph};
use dataflow_core::features::read_write_graph::{DefSite, NodeId, ReadWriteGraph};
use std::collections::BTreeSet;

/// Does `write` reach the entry of `at` along a path whose inner nodes
/// perform no strong write at all?
///
/// Such a write can never be hidden, so every sound engine reports it.
pub fn reaches_unhidden(graph: &ReadWriteGraph, write: NodeId, at: NodeId) -> bool {
    if !graph.reachable_from_root()[write.index()] {
        return false;
    }

    let mut seen = vec![false; graph.len()];
    let mut stack: Vec<NodeId> = graph
        .node(write)
        .map(|n| n.successors().to_vec())
        .unwrap_or_default();

    while let Some(id) = stack.pop() {
        if id == at {
            return true;
        }
        if seen[id.index()] {
            continue;
        }
        seen[id.index()] = true;
        let Some(node) = graph.node(id) else {
            continue;
        };
        if node.overwrites.is_empty() {
            stack.extend(node.successors().iter().copied());
        }
    }
    false
}

/// Writes that any sound engine must report for `query` at `at`
pub fn must_report(graph: &ReadWriteGraph, at: NodeId, query: &DefSite) -> BTreeSet<NodeId> {
    graph
        .nodes()
        .filter(|n| n.writes().any(|(site, _)| site.may_overlap(query)))
        .map(|n| n.id())
        .filter(|&w| reaches_unhidden(graph, w, at))
        .collect()
}

/// Breadth-first closure of the root, computed independently of the validator
pub fn ps_reachable(graph: &PointerGraph) -> BTreeSet<PSNodeId> {
    let mut reachable = BTreeSet::new();
    let Some(root) = graph.root() else {
        return reachable;
    };
    reachable.insert(root);
    let mut frontier = vec![root];
    while !frontier.is_empty() {
        let mut next = Vec::new();
        for id in frontier {
            if let Some(node) = graph.node(id) {
                for &succ in node.successors() {
                    if graph.contains(succ) && reachable.insert(succ) {
                        next.push(succ);
                    }
                }
            }
        }
        frontier = next;
    }
    reachable
}
