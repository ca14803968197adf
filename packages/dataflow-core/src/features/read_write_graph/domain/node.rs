//! Read-write graph nodes (program points touching memory)

use super::def_site::DefSite;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a node in its graph's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u32);

impl NodeId {
    /// Node 0 of every graph: memory whose identity is not known
    pub const UNKNOWN_MEMORY: NodeId = NodeId(0);

    #[inline]
    pub const fn new(index: u32) -> Self {
        NodeId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of program point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RWNodeType {
    /// Stack allocation (a memory object)
    Alloc,
    /// Heap allocation (a memory object)
    DynAlloc,
    /// Global variable (a memory object)
    Global,
    Store,
    Load,
    /// Frontend-level merge; not the Memory-SSA engine's phis
    Phi,
    Call,
    Return,
    Noop,
    /// The distinguished unknown-memory object
    UnknownMemory,
}

impl RWNodeType {
    /// Does a node of this type stand for a memory object?
    pub fn is_memory_object(self) -> bool {
        matches!(
            self,
            RWNodeType::Alloc
                | RWNodeType::DynAlloc
                | RWNodeType::Global
                | RWNodeType::UnknownMemory
        )
    }
}

/// A program point with its memory reads/writes and CFG edges
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RWNode {
    id: NodeId,
    node_type: RWNodeType,

    /// Weak (may) writes. Never kill earlier writes.
    pub defs: Vec<DefSite>,

    /// Strong (must) writes. Kill earlier writes they cover.
    pub overwrites: Vec<DefSite>,

    /// Reads
    pub uses: Vec<DefSite>,

    pub(crate) successors: Vec<NodeId>,
    pub(crate) predecessors: Vec<NodeId>,
}

impl RWNode {
    pub(crate) fn new(id: NodeId, node_type: RWNodeType) -> Self {
        Self {
            id,
            node_type,
            defs: Vec::new(),
            overwrites: Vec::new(),
            uses: Vec::new(),
            successors: Vec::new(),
            predecessors: Vec::new(),
        }
    }

    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    #[inline]
    pub fn node_type(&self) -> RWNodeType {
        self.node_type
    }

    pub fn add_def(&mut self, site: DefSite) {
        self.defs.push(site);
    }

    pub fn add_overwrite(&mut self, site: DefSite) {
        self.overwrites.push(site);
    }

    pub fn add_use(&mut self, site: DefSite) {
        self.uses.push(site);
    }

    pub fn successors(&self) -> &[NodeId] {
        &self.successors
    }

    pub fn predecessors(&self) -> &[NodeId] {
        &self.predecessors
    }

    pub fn is_use(&self) -> bool {
        !self.uses.is_empty()
    }

    pub fn is_write(&self) -> bool {
        !self.defs.is_empty() || !self.overwrites.is_empty()
    }

    /// All writes in a fixed order: weak defs first, then overwrites.
    ///
    /// The position in this sequence is the site index used by the engines.
    pub fn writes(&self) -> impl Iterator<Item = (&DefSite, bool)> + '_ {
        self.defs
            .iter()
            .map(|ds| (ds, false))
            .chain(self.overwrites.iter().map(|ds| (ds, true)))
    }
}
