//! Dataflow facts of the fixpoint engine

use crate::features::read_write_graph::NodeId;
use std::collections::BTreeSet;

/// One write: `node`'s `site`-th write descriptor (see `RWNode::writes`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Definition {
    pub node: NodeId,
    pub site: u32,
}

impl Definition {
    pub fn new(node: NodeId, site: u32) -> Self {
        Self { node, site }
    }
}

/// Set of reaching writes, ordered by `(node, site)`
pub type DefinitionSet = BTreeSet<Definition>;
