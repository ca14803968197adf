/*
 * Reaching Definitions - worklist fixpoint
 *
 * Classic dataflow framework (Kildall 1973) over the Read-Write Graph.
 *
 * Algorithm:
 * 1. IN[n] = OUT[n] = ∅ for every node
 * 2. worklist = reachable nodes in reverse postorder
 * 3. While worklist not empty:
 *    a. Pop node n
 *    b. Meet:     IN[n]  = ⋃ OUT[p] for reachable predecessors p
 *    c. Transfer: OUT[n] = (IN[n] − killed(n)) ∪ writes(n)
 *    d. If OUT[n] changed (or first visit): enqueue successors
 *
 * A fact is killed by n only if one of n's strong writes covers the
 * fact's whole range on the same concrete object. Unknown ranges and
 * UNKNOWN_MEMORY never kill. Sets only grow, so the loop terminates.
 */

use super::definitions::{Definition, DefinitionSet};
use crate::config::DataDependenceOptions;
use crate::features::data_dependence::infrastructure::{DataDependenceError, DataDependenceResult};
use crate::features::data_dependence::ports::DataDependenceEngine;
use crate::features::read_write_graph::{AccessTable, DefSite, NodeId, ReadWriteGraph};
use crate::shared::models::Offset;
use std::collections::VecDeque;
use tracing::{debug, warn};

/// Statistics of a finished run
#[derive(Debug, Clone, Default)]
pub struct ReachingDefinitionsStats {
    pub iterations: usize,
    pub reachable_nodes: usize,
    pub max_set_size: usize,
}

/// Fixpoint reaching-definitions engine
pub struct ReachingDefinitionsAnalysis {
    graph: ReadWriteGraph,
    options: DataDependenceOptions,

    accesses: AccessTable,
    in_sets: Vec<DefinitionSet>,
    out_sets: Vec<DefinitionSet>,
    reachable: Vec<bool>,

    done: bool,
    stats: ReachingDefinitionsStats,
}

impl ReachingDefinitionsAnalysis {
    /// Take ownership of `graph`. Does not run anything.
    pub fn new(graph: ReadWriteGraph, options: DataDependenceOptions) -> Self {
        Self {
            graph,
            options,
            accesses: AccessTable::default(),
            in_sets: Vec::new(),
            out_sets: Vec::new(),
            reachable: Vec::new(),
            done: false,
            stats: ReachingDefinitionsStats::default(),
        }
    }

    pub fn stats(&self) -> &ReachingDefinitionsStats {
        &self.stats
    }

    pub fn options(&self) -> &DataDependenceOptions {
        &self.options
    }

    /// Writes reaching the entry of `node` (the IN set)
    pub fn reaching_definitions(&self, node: NodeId) -> DataDependenceResult<&DefinitionSet> {
        self.check_ready(node)?;
        Ok(&self.in_sets[node.index()])
    }

    /// Query without `&mut self`; the engine never changes after `run()`.
    pub fn definitions_at(
        &self,
        at: NodeId,
        mem: NodeId,
        offset: Offset,
        len: Offset,
    ) -> DataDependenceResult<Vec<NodeId>> {
        self.check_ready(at)?;
        if !self.graph.contains(mem) {
            return Err(DataDependenceError::UnknownNode { id: mem });
        }

        let query = self.accesses.normalize(DefSite::new(mem, offset, len));
        let mut result: Vec<NodeId> = Vec::new();
        for def in &self.in_sets[at.index()] {
            let Some(site) = self.accesses.write_site(def.node, def.site) else {
                continue;
            };
            // facts are ordered by node, so duplicates are adjacent
            if site.may_overlap(&query) && result.last() != Some(&def.node) {
                result.push(def.node);
            }
        }
        Ok(result)
    }

    fn check_ready(&self, node: NodeId) -> DataDependenceResult<()> {
        if !self.done {
            return Err(DataDependenceError::NotRun);
        }
        if !self.graph.contains(node) {
            return Err(DataDependenceError::UnknownNode { id: node });
        }
        Ok(())
    }

    /// Meet: union of OUT sets of reachable predecessors
    fn meet(&self, node: NodeId) -> DefinitionSet {
        let mut new_in = DefinitionSet::new();
        let Some(n) = self.graph.node(node) else {
            return new_in;
        };
        for &pred in n.predecessors() {
            if self.reachable.get(pred.index()).copied().unwrap_or(false) {
                new_in.extend(self.out_sets[pred.index()].iter().copied());
            }
        }
        new_in
    }

    /// Transfer: OUT = (IN − killed) ∪ gen
    fn transfer(&self, node: NodeId, in_set: &DefinitionSet) -> DefinitionSet {
        let overwrites: Vec<&DefSite> = self.accesses.overwrites(node).collect();

        let mut out: DefinitionSet = if overwrites.is_empty() {
            in_set.clone()
        } else {
            in_set
                .iter()
                .filter(|def| {
                    let Some(site) = self.accesses.write_site(def.node, def.site) else {
                        return true;
                    };
                    !overwrites.iter().any(|ow| ow.covers(site))
                })
                .copied()
                .collect()
        };

        for site in 0..self.accesses.writes(node).len() {
            out.insert(Definition::new(node, site as u32));
        }
        out
    }
}

impl DataDependenceEngine for ReachingDefinitionsAnalysis {
    fn run(&mut self) -> DataDependenceResult<()> {
        if self.done {
            return Err(DataDependenceError::AlreadyRun);
        }
        if let Err(err) = self.options.validate() {
            return Err(DataDependenceError::InvalidOptions {
                reason: err.to_string(),
            });
        }
        if let Some(reason) = self.graph.structural_error() {
            return Err(DataDependenceError::InvalidGraph { reason });
        }

        let asymmetric = self.graph.asymmetric_edges();
        if !asymmetric.is_empty() {
            warn!(
                "Read-write graph has {} asymmetric edges; results follow predecessor lists",
                asymmetric.len()
            );
        }

        let n = self.graph.len();
        self.accesses = AccessTable::build(&self.graph, self.options.field_insensitive);
        self.reachable = self.graph.reachable_from_root();
        self.in_sets = vec![DefinitionSet::new(); n];
        self.out_sets = vec![DefinitionSet::new(); n];

        let order = self.graph.reverse_postorder();
        let mut visited = vec![false; n];
        let mut in_worklist = vec![false; n];
        let mut worklist: VecDeque<NodeId> = VecDeque::with_capacity(order.len());
        for &id in &order {
            in_worklist[id.index()] = true;
            worklist.push_back(id);
        }

        debug!(
            "Reaching definitions: {} reachable nodes of {}",
            order.len(),
            n
        );

        let mut iterations = 0usize;
        while let Some(node) = worklist.pop_front() {
            in_worklist[node.index()] = false;
            iterations += 1;
            if let Some(limit) = self.options.max_iterations {
                if iterations > limit {
                    warn!("Reaching definitions: exceeded max iterations ({})", limit);
                    return Err(DataDependenceError::IterationLimitExceeded { limit });
                }
            }

            let new_in = self.meet(node);
            let new_out = self.transfer(node, &new_in);
            self.in_sets[node.index()] = new_in;

            // first visit counts as a change so every reachable node propagates
            let changed = !visited[node.index()] || new_out != self.out_sets[node.index()];
            visited[node.index()] = true;
            if !changed {
                continue;
            }

            #[cfg(feature = "trace")]
            tracing::trace!(
                "Node {} changed: {} facts -> {} facts",
                node,
                self.out_sets[node.index()].len(),
                new_out.len()
            );

            self.out_sets[node.index()] = new_out;
            if let Some(n) = self.graph.node(node) {
                for &succ in n.successors() {
                    if self.reachable.get(succ.index()).copied().unwrap_or(false)
                        && !in_worklist[succ.index()]
                    {
                        in_worklist[succ.index()] = true;
                        worklist.push_back(succ);
                    }
                }
            }
        }

        self.stats = ReachingDefinitionsStats {
            iterations,
            reachable_nodes: order.len(),
            max_set_size: self.in_sets.iter().map(|s| s.len()).max().unwrap_or(0),
        };
        self.done = true;

        debug!(
            "Reaching definitions converged after {} iterations (max IN size {})",
            iterations, self.stats.max_set_size
        );
        Ok(())
    }

    fn has_run(&self) -> bool {
        self.done
    }

    fn graph(&self) -> &ReadWriteGraph {
        &self.graph
    }

    fn get_definitions(
        &mut self,
        at: NodeId,
        mem: NodeId,
        offset: Offset,
        len: Offset,
    ) -> DataDependenceResult<Vec<NodeId>> {
        self.definitions_at(at, mem, offset, len)
    }
}
