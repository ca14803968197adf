//! # Read-Write Graph
//!
//! Memory-access graph handed over by a frontend: nodes are program
//! points that read and/or write `(object, offset, length)` ranges,
//! edges form a control-flow graph.

pub mod domain;
pub mod infrastructure;

pub use domain::{DefSite, NodeId, RWNode, RWNodeType, ReadWriteGraph};
pub use infrastructure::{AccessTable, BasicBlock, BasicBlocks, BlockId};
