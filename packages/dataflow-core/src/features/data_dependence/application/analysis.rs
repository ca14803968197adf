//! Data-dependence facade
//!
//! Owns the graph through the selected engine and forwards every query.
//!
//! ```text
//! DataDependenceOptions { use_ssa }
//!        ↓
//! DataDependenceAnalysis
//!        ↓
//! MemorySSATransformation | ReachingDefinitionsAnalysis
//! ```

use super::super::infrastructure::DataDependenceResult;
use super::super::ports::DataDependenceEngine;
use crate::config::DataDependenceOptions;
use crate::features::memory_ssa::MemorySSATransformation;
use crate::features::reaching_definitions::ReachingDefinitionsAnalysis;
use crate::features::read_write_graph::{NodeId, ReadWriteGraph};
use crate::shared::models::Offset;
use tracing::info;

/// The engine chosen at construction
pub enum Engine {
    ReachingDefinitions(ReachingDefinitionsAnalysis),
    MemorySsa(MemorySSATransformation),
}

impl Engine {
    fn as_dyn(&self) -> &dyn DataDependenceEngine {
        match self {
            Engine::ReachingDefinitions(rd) => rd,
            Engine::MemorySsa(ssa) => ssa,
        }
    }

    fn as_dyn_mut(&mut self) -> &mut dyn DataDependenceEngine {
        match self {
            Engine::ReachingDefinitions(rd) => rd,
            Engine::MemorySsa(ssa) => ssa,
        }
    }
}

/// Memory data dependence over a Read-Write Graph
pub struct DataDependenceAnalysis {
    engine: Engine,
    options: DataDependenceOptions,
}

impl DataDependenceAnalysis {
    /// Select the engine from `options.use_ssa`. Nothing is computed yet.
    pub fn new(graph: ReadWriteGraph, options: DataDependenceOptions) -> Self {
        let engine = if options.use_ssa {
            Engine::MemorySsa(MemorySSATransformation::new(graph, options.clone()))
        } else {
            Engine::ReachingDefinitions(ReachingDefinitionsAnalysis::new(graph, options.clone()))
        };
        info!(
            "Data dependence engine: {}",
            if options.use_ssa { "memory-ssa" } else { "reaching-definitions" }
        );
        Self { engine, options }
    }

    pub fn with_defaults(graph: ReadWriteGraph) -> Self {
        Self::new(graph, DataDependenceOptions::default())
    }

    /// Run the selected engine.
    ///
    /// Out-of-range options fail with `InvalidOptions` and a malformed
    /// graph with `InvalidGraph`; neither leaves the analysis marked as run.
    pub fn run(&mut self) -> DataDependenceResult<()> {
        self.engine.as_dyn_mut().run()
    }

    pub fn has_run(&self) -> bool {
        self.engine.as_dyn().has_run()
    }

    /// Writes to `[offset, offset+len)` of `mem` reaching the entry of `at`
    pub fn get_definitions(
        &mut self,
        at: NodeId,
        mem: NodeId,
        offset: Offset,
        len: Offset,
    ) -> DataDependenceResult<Vec<NodeId>> {
        self.engine.as_dyn_mut().get_definitions(at, mem, offset, len)
    }

    pub fn get_definitions_for_use(
        &mut self,
        use_node: NodeId,
    ) -> DataDependenceResult<Vec<NodeId>> {
        self.engine.as_dyn_mut().get_definitions_for_use(use_node)
    }

    pub fn graph(&self) -> &ReadWriteGraph {
        self.engine.as_dyn().graph()
    }

    pub fn root(&self) -> Option<NodeId> {
        self.engine.as_dyn().root()
    }

    pub fn options(&self) -> &DataDependenceOptions {
        &self.options
    }

    pub fn is_ssa(&self) -> bool {
        matches!(self.engine, Engine::MemorySsa(_))
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }
}
