//! Read-Write Graph
//!
//! Arena of `RWNode`s with index-based CFG edges. The graph owns every
//! node; edges are plain `NodeId`s, so cycles need no special care.
//! Node 0 is always the UNKNOWN_MEMORY object.

use super::def_site::DefSite;
use super::node::{NodeId, RWNode, RWNodeType};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadWriteGraph {
    nodes: Vec<RWNode>,
    root: Option<NodeId>,
}

impl Default for ReadWriteGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadWriteGraph {
    pub fn new() -> Self {
        Self {
            nodes: vec![RWNode::new(NodeId::UNKNOWN_MEMORY, RWNodeType::UnknownMemory)],
            root: None,
        }
    }

    /// Create a node and return its id
    pub fn add_node(&mut self, node_type: RWNodeType) -> NodeId {
        let id = NodeId::new(self.nodes.len() as u32);
        self.nodes.push(RWNode::new(id, node_type));
        id
    }

    /// Add the CFG edge `from -> to`, keeping both edge lists in sync.
    ///
    /// Duplicate edges are ignored. Returns false if either end is not
    /// a node of this graph.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId) -> bool {
        if !self.contains(from) || !self.contains(to) {
            return false;
        }
        if self.nodes[from.index()].successors.contains(&to) {
            return true;
        }
        self.nodes[from.index()].successors.push(to);
        self.nodes[to.index()].predecessors.push(from);
        true
    }

    /// Chain `ids` with edges in order
    pub fn add_path(&mut self, ids: &[NodeId]) {
        for pair in ids.windows(2) {
            self.add_edge(pair[0], pair[1]);
        }
    }

    pub fn set_root(&mut self, root: NodeId) -> bool {
        if !self.contains(root) {
            return false;
        }
        self.root = Some(root);
        true
    }

    #[inline]
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> Option<&RWNode> {
        self.nodes.get(id.index())
    }

    #[inline]
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut RWNode> {
        self.nodes.get_mut(id.index())
    }

    pub fn nodes(&self) -> impl Iterator<Item = &RWNode> + '_ {
        self.nodes.iter()
    }

    /// Number of nodes, UNKNOWN_MEMORY included
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Only UNKNOWN_MEMORY present?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Convenience: create a node and attach one write
    pub fn add_store(&mut self, site: DefSite, strong: bool) -> NodeId {
        let id = self.add_node(RWNodeType::Store);
        let node = &mut self.nodes[id.index()];
        if strong {
            node.add_overwrite(site);
        } else {
            node.add_def(site);
        }
        id
    }

    /// Convenience: create a node reading `site`
    pub fn add_load(&mut self, site: DefSite) -> NodeId {
        let id = self.add_node(RWNodeType::Load);
        self.nodes[id.index()].add_use(site);
        id
    }

    /// Nodes reachable from the root along successor edges (root included).
    ///
    /// Indexed by `NodeId::index()`. All false when there is no root.
    pub fn reachable_from_root(&self) -> Vec<bool> {
        let mut reachable = vec![false; self.nodes.len()];
        let Some(root) = self.root.filter(|&r| self.contains(r)) else {
            return reachable;
        };

        let mut queue = VecDeque::new();
        reachable[root.index()] = true;
        queue.push_back(root);

        while let Some(cur) = queue.pop_front() {
            for &succ in &self.nodes[cur.index()].successors {
                if let Some(seen) = reachable.get_mut(succ.index()) {
                    if !*seen {
                        *seen = true;
                        queue.push_back(succ);
                    }
                }
            }
        }

        reachable
    }

    /// Reverse postorder of the nodes reachable from the root
    pub fn reverse_postorder(&self) -> Vec<NodeId> {
        let Some(root) = self.root.filter(|&r| self.contains(r)) else {
            return Vec::new();
        };

        let mut visited = vec![false; self.nodes.len()];
        let mut postorder = Vec::with_capacity(self.nodes.len());
        // (node, next successor index)
        let mut stack: Vec<(NodeId, usize)> = vec![(root, 0)];
        visited[root.index()] = true;

        while let Some((node, next)) = stack.last_mut() {
            let succs = &self.nodes[node.index()].successors;
            if let Some(&succ) = succs.get(*next) {
                *next += 1;
                if succ.index() < visited.len() && !visited[succ.index()] {
                    visited[succ.index()] = true;
                    stack.push((succ, 0));
                }
            } else {
                postorder.push(*node);
                stack.pop();
            }
        }

        postorder.reverse();
        postorder
    }

    /// First structural defect of a graph that did not come from the
    /// `add_*` builders (e.g. one deserialized from a frontend).
    ///
    /// Checks that a root is set and names a node, that every node sits at
    /// the slot its id names, that node 0 is UNKNOWN_MEMORY and that every
    /// edge endpoint is a node of the graph.
    pub fn structural_error(&self) -> Option<String> {
        let Some(root) = self.root else {
            return Some("graph has no root".to_string());
        };
        if !self.contains(root) {
            return Some(format!(
                "root {} is not a node of the graph ({} nodes)",
                root,
                self.nodes.len()
            ));
        }
        if self.nodes[NodeId::UNKNOWN_MEMORY.index()].node_type() != RWNodeType::UnknownMemory {
            return Some("node 0 is not the UNKNOWN_MEMORY object".to_string());
        }
        for (slot, node) in self.nodes.iter().enumerate() {
            if node.id().index() != slot {
                return Some(format!("node {} is stored at slot {}", node.id(), slot));
            }
            let dangling = node
                .successors
                .iter()
                .chain(&node.predecessors)
                .find(|&&other| !self.contains(other));
            if let Some(other) = dangling {
                return Some(format!("node {} has an edge to missing node {}", node.id(), other));
            }
        }
        None
    }

    /// Edges `(a, b)` where exactly one of "b in succs(a)" / "a in preds(b)" holds
    pub fn asymmetric_edges(&self) -> Vec<(NodeId, NodeId)> {
        let mut broken = Vec::new();
        for node in &self.nodes {
            for &succ in &node.successors {
                let ok = self
                    .node(succ)
                    .is_some_and(|s| s.predecessors.contains(&node.id()));
                if !ok {
                    broken.push((node.id(), succ));
                }
            }
            for &pred in &node.predecessors {
                let ok = self
                    .node(pred)
                    .is_some_and(|p| p.successors.contains(&node.id()));
                if !ok {
                    broken.push((pred, node.id()));
                }
            }
        }
        broken
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diamond() -> (ReadWriteGraph, [NodeId; 4]) {
        let mut g = ReadWriteGraph::new();
        let a = g.add_node(RWNodeType::Noop);
        let b = g.add_node(RWNodeType::Noop);
        let c = g.add_node(RWNodeType::Noop);
        let d = g.add_node(RWNodeType::Noop);
        g.add_edge(a, b);
        g.add_edge(a, c);
        g.add_edge(b, d);
        g.add_edge(c, d);
        g.set_root(a);
        (g, [a, b, c, d])
    }

    #[test]
    fn test_unknown_memory_is_node_zero() {
        let g = ReadWriteGraph::new();
        assert!(g.is_empty());
        assert_eq!(
            g.node(NodeId::UNKNOWN_MEMORY).map(|n| n.node_type()),
            Some(RWNodeType::UnknownMemory)
        );
    }

    #[test]
    fn test_edges_are_symmetric() {
        let (g, [a, b, _, d]) = diamond();
        assert_eq!(g.node(a).unwrap().successors().len(), 2);
        assert_eq!(g.node(d).unwrap().predecessors().len(), 2);
        assert!(g.node(b).unwrap().predecessors().contains(&a));
        assert!(g.asymmetric_edges().is_empty());
    }

    #[test]
    fn test_duplicate_edge_ignored() {
        let (mut g, [a, b, _, _]) = diamond();
        assert!(g.add_edge(a, b));
        assert_eq!(g.node(b).unwrap().predecessors(), &[a]);
    }

    #[test]
    fn test_edge_to_missing_node_rejected() {
        let (mut g, [a, _, _, _]) = diamond();
        assert!(!g.add_edge(a, NodeId::new(99)));
    }

    #[test]
    fn test_reachability_with_cycle() {
        let (mut g, [a, _, _, d]) = diamond();
        g.add_edge(d, a);
        let orphan = g.add_node(RWNodeType::Noop);
        let reachable = g.reachable_from_root();
        assert!(reachable[d.index()]);
        assert!(!reachable[orphan.index()]);
        assert!(!reachable[NodeId::UNKNOWN_MEMORY.index()]);
    }

    #[test]
    fn test_structural_error() {
        let (g, _) = diamond();
        assert_eq!(g.structural_error(), None);
        assert_eq!(
            ReadWriteGraph::new().structural_error(),
            Some("graph has no root".to_string())
        );
    }

    #[test]
    fn test_root_outside_arena() {
        let json = serde_json::to_string(&ReadWriteGraph::new())
            .unwrap()
            .replace("\"root\":null", "\"root\":9");
        let g: ReadWriteGraph = serde_json::from_str(&json).unwrap();

        assert!(g.reachable_from_root().iter().all(|r| !r));
        assert!(g.reverse_postorder().is_empty());
        assert!(g.structural_error().is_some_and(|e| e.contains("root 9")));
    }

    #[test]
    fn test_reverse_postorder() {
        let (g, [a, b, c, d]) = diamond();
        let rpo = g.reverse_postorder();
        assert_eq!(rpo.len(), 4);
        assert_eq!(rpo[0], a);
        assert_eq!(rpo[3], d);
        assert!(rpo.contains(&b) && rpo.contains(&c));
    }
}
