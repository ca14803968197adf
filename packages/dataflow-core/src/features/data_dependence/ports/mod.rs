//! Engine port: what the facade needs from a data-dependence engine

use super::infrastructure::{DataDependenceError, DataDependenceResult};
use crate::features::read_write_graph::{DefSite, NodeId, ReadWriteGraph};
use crate::shared::models::Offset;

/// A reaching-definitions engine over an owned `ReadWriteGraph`
///
/// Engines are not re-entrant: a second `run()` fails with `AlreadyRun`
/// and every query before `run()` fails with `NotRun`.
pub trait DataDependenceEngine {
    /// Compute the analysis
    fn run(&mut self) -> DataDependenceResult<()>;

    fn has_run(&self) -> bool;

    fn graph(&self) -> &ReadWriteGraph;

    fn root(&self) -> Option<NodeId> {
        self.graph().root()
    }

    /// Writes to `mem` overlapping `[offset, offset+len)` that reach `at`
    fn get_definitions(
        &mut self,
        at: NodeId,
        mem: NodeId,
        offset: Offset,
        len: Offset,
    ) -> DataDependenceResult<Vec<NodeId>>;

    /// Reaching definitions of everything `use_node` reads
    fn get_definitions_for_use(&mut self, use_node: NodeId) -> DataDependenceResult<Vec<NodeId>> {
        if !self.has_run() {
            return Err(DataDependenceError::NotRun);
        }
        let uses: Vec<DefSite> = self
            .graph()
            .node(use_node)
            .ok_or(DataDependenceError::UnknownNode { id: use_node })?
            .uses
            .clone();

        let mut result = Vec::new();
        for site in uses {
            for def in self.get_definitions(use_node, site.target, site.offset, site.len)? {
                if !result.contains(&def) {
                    result.push(def);
                }
            }
        }
        result.sort_unstable();
        Ok(result)
    }
}
