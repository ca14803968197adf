//! Domain models of points-to graphs
//!
//! - PSNode / PSNodeType: typed pointer operations with operand lists
//! - PointerGraph: arena of nodes with symmetric CFG edges

pub mod pointer_graph;
pub mod ps_node;

pub use pointer_graph::PointerGraph;
pub use ps_node::{Arity, PSNode, PSNodeId, PSNodeType};
