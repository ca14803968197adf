//! Domain model: nodes, memory-access descriptors and the graph arena

pub mod def_site;
pub mod graph;
pub mod node;

pub use def_site::DefSite;
pub use graph::ReadWriteGraph;
pub use node::{NodeId, RWNode, RWNodeType};
