//! Points-to graph
//!
//! Output of a pointer analysis frontend, consumed read-only by the
//! validator. Same arena layout as the Read-Write Graph.

use super::ps_node::{PSNode, PSNodeId, PSNodeType};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PointerGraph {
    nodes: Vec<PSNode>,
    root: Option<PSNodeId>,
}

impl PointerGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a node. Operands are taken as given; the validator reports
    /// operands that name no node.
    pub fn add_node(&mut self, node_type: PSNodeType, operands: Vec<PSNodeId>) -> PSNodeId {
        let id = PSNodeId(self.nodes.len() as u32);
        self.nodes.push(PSNode::new(id, node_type, operands));
        id
    }

    /// Add `from -> to` to both edge lists
    pub fn add_edge(&mut self, from: PSNodeId, to: PSNodeId) -> bool {
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

    /// Record `to` as successor of `from` without the back edge
    pub fn add_successor_only(&mut self, from: PSNodeId, to: PSNodeId) -> bool {
        if !self.contains(from) || !self.contains(to) {
            return false;
        }
        self.nodes[from.index()].successors.push(to);
        true
    }

    /// Record `from` as predecessor of `to` without the forward edge
    pub fn add_predecessor_only(&mut self, to: PSNodeId, from: PSNodeId) -> bool {
        if !self.contains(from) || !self.contains(to) {
            return false;
        }
        self.nodes[to.index()].predecessors.push(from);
        true
    }

    /// Chain `ids` with edges in order
    pub fn add_path(&mut self, ids: &[PSNodeId]) {
        for pair in ids.windows(2) {
            self.add_edge(pair[0], pair[1]);
        }
    }

    pub fn set_root(&mut self, root: PSNodeId) -> bool {
        if !self.contains(root) {
            return false;
        }
        self.root = Some(root);
        true
    }

    #[inline]
    pub fn root(&self) -> Option<PSNodeId> {
        self.root
    }

    #[inline]
    pub fn contains(&self, id: PSNodeId) -> bool {
        id.index() < self.nodes.len()
    }

    #[inline]
    pub fn node(&self, id: PSNodeId) -> Option<&PSNode> {
        self.nodes.get(id.index())
    }

    pub fn nodes(&self) -> impl Iterator<Item = &PSNode> + '_ {
        self.nodes.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
