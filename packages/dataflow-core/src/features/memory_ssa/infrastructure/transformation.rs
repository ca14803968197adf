/*
 * Memory SSA
 *
 * Pruned SSA form over memory, built on demand in the style of
 * Braun et al. "Simple and Efficient Construction of SSA Form" (2013),
 * with byte intervals of an object playing the role of variables.
 *
 * find_definitions(block, end, object, uncovered):
 *     walk the block backwards from `end`:
 *         every write overlapping `uncovered` is a definition
 *         strong writes with known range remove their bytes from `uncovered`
 *     if uncovered is empty      → done
 *     elif block is the entry    → done (nothing defines the rest)
 *     elif one predecessor       → continue in the predecessor
 *     else                       → one phi per uncovered interval,
 *                                  memoized per (block, object, interval)
 *
 * A phi is registered before its operands are filled, so loops terminate.
 * The walk keeps its own stack of pending lookups and phi fills instead
 * of recursing once per join.
 * A phi with a single distinct operand is trivial and is replaced by it.
 *
 * Because several partial strong writes can together hide an older write,
 * results are never larger than those of the fixpoint engine.
 */

use super::interval_set::IntervalSet;
use crate::config::DataDependenceOptions;
use crate::features::data_dependence::infrastructure::{DataDependenceError, DataDependenceResult};
use crate::features::data_dependence::ports::DataDependenceEngine;
use crate::features::read_write_graph::{
    AccessTable, BasicBlocks, BlockId, DefSite, NodeId, ReadWriteGraph,
};
use crate::shared::models::{known_interval, Offset};
use rustc_hash::FxHashMap;
use tracing::debug;

/// Phi index in `MemorySSATransformation::phis`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PhiId(pub u32);

/// An SSA-level definition of memory: a real write or a merge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemoryDef {
    Write(NodeId),
    Phi(PhiId),
}

/// Merge of the definitions of `[start, end)` of `target` at a join block
#[derive(Debug, Clone)]
pub struct MemoryPhi {
    pub id: PhiId,
    pub block: BlockId,
    pub target: NodeId,
    pub start: u64,
    pub end: u64,
    pub operands: Vec<MemoryDef>,
    /// Replaced by its only distinct operand
    pub trivial: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct PhiKey {
    block: BlockId,
    target: NodeId,
    start: u64,
    end: u64,
}

/// Memory SSA statistics
#[derive(Debug, Clone, Default)]
pub struct MemorySSAStats {
    pub blocks: usize,
    pub phis_created: usize,
    pub trivial_phis: usize,
    pub resolved_uses: usize,
}

/// Memory-SSA data-dependence engine
pub struct MemorySSATransformation {
    graph: ReadWriteGraph,
    options: DataDependenceOptions,

    accesses: AccessTable,
    blocks: BasicBlocks,
    written_objects: Vec<NodeId>,

    phis: Vec<MemoryPhi>,
    phi_cache: FxHashMap<PhiKey, MemoryDef>,

    /// SSA form of every reachable use
    use_memory_defs: FxHashMap<NodeId, Vec<MemoryDef>>,
    use_definitions: FxHashMap<NodeId, Vec<NodeId>>,

    done: bool,
    stats: MemorySSAStats,
}

/// Outcome of a backwards scan that needs no phi lookup
enum Walk {
    Done(Vec<MemoryDef>),
    /// Stopped at a join block with `intervals` still uncovered
    Join {
        found: Vec<MemoryDef>,
        block: BlockId,
        intervals: Vec<(u64, u64)>,
    },
}

enum Frame {
    /// Waiting for the phis of `intervals[next..]` at `block`
    Lookup {
        found: Vec<MemoryDef>,
        block: BlockId,
        intervals: Vec<(u64, u64)>,
        next: usize,
    },
    /// Filling the operands of phi `id` from `preds[next..]`
    Phi {
        key: PhiKey,
        id: PhiId,
        preds: Vec<BlockId>,
        next: usize,
        operands: Vec<MemoryDef>,
    },
}

enum Returned {
    Defs(Vec<MemoryDef>),
    Def(MemoryDef),
}

enum Action {
    Push(Frame),
    Pop(Returned),
}

fn push_unique(defs: &mut Vec<MemoryDef>, def: MemoryDef) {
    if !defs.contains(&def) {
        defs.push(def);
    }
}

impl MemorySSATransformation {
    /// Take ownership of `graph`. Does not run anything.
    pub fn new(graph: ReadWriteGraph, options: DataDependenceOptions) -> Self {
        Self {
            graph,
            options,
            accesses: AccessTable::default(),
            blocks: BasicBlocks::default(),
            written_objects: Vec::new(),
            phis: Vec::new(),
            phi_cache: FxHashMap::default(),
            use_memory_defs: FxHashMap::default(),
            use_definitions: FxHashMap::default(),
            done: false,
            stats: MemorySSAStats::default(),
        }
    }

    pub fn stats(&self) -> &MemorySSAStats {
        &self.stats
    }

    pub fn options(&self) -> &DataDependenceOptions {
        &self.options
    }

    pub fn phis(&self) -> &[MemoryPhi] {
        &self.phis
    }

    pub fn blocks(&self) -> &BasicBlocks {
        &self.blocks
    }

    /// SSA-level definitions of `use_node` (writes and phis), as built by `run()`
    pub fn memory_defs_for_use(&self, use_node: NodeId) -> DataDependenceResult<&[MemoryDef]> {
        self.check_ready(use_node)?;
        Ok(self
            .use_memory_defs
            .get(&use_node)
            .map(Vec::as_slice)
            .unwrap_or(&[]))
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

    /// Could the write `ds` define bytes of `target` still in `uncovered`?
    fn write_matches(ds: &DefSite, target: NodeId, uncovered: &IntervalSet) -> bool {
        if uncovered.is_empty() {
            return false;
        }
        if target == NodeId::UNKNOWN_MEMORY {
            return ds.target == NodeId::UNKNOWN_MEMORY;
        }
        if ds.target == NodeId::UNKNOWN_MEMORY {
            return true;
        }
        if ds.target != target {
            return false;
        }
        match known_interval(ds.offset, ds.len) {
            Some((start, end)) => uncovered.intersects(start, end),
            None => true,
        }
    }

    /// Walk nodes `[0, end)` of `block` backwards.
    ///
    /// Returns true once every byte of `uncovered` is overwritten.
    fn scan_block(
        &self,
        block: BlockId,
        end: usize,
        target: NodeId,
        uncovered: &mut IntervalSet,
        found: &mut Vec<MemoryDef>,
    ) -> bool {
        let nodes = &self.blocks.block(block).nodes;
        for &node in nodes[..end.min(nodes.len())].iter().rev() {
            let writes = self.accesses.writes(node);
            if writes
                .iter()
                .any(|(ds, _)| Self::write_matches(ds, target, uncovered))
            {
                push_unique(found, MemoryDef::Write(node));
            }

            if target != NodeId::UNKNOWN_MEMORY {
                for (ds, strong) in writes {
                    if !*strong || ds.target != target {
                        continue;
                    }
                    if let Some((start, end)) = known_interval(ds.offset, ds.len) {
                        uncovered.subtract(start, end);
                    }
                }
            }

            if uncovered.is_empty() {
                return true;
            }
        }
        false
    }

    /// Scan backwards from `end` in `block`, following single-predecessor
    /// blocks, until the query is covered or a join block is reached.
    fn walk(
        &self,
        mut block: BlockId,
        mut end: usize,
        target: NodeId,
        mut uncovered: IntervalSet,
    ) -> Walk {
        let mut found = Vec::new();
        loop {
            if self.scan_block(block, end, target, &mut uncovered, &mut found) {
                return Walk::Done(found);
            }
            let is_entry = self.blocks.entry() == Some(block);
            match self.blocks.block(block).predecessors.as_slice() {
                [] => return Walk::Done(found),
                [pred] if !is_entry => {
                    block = *pred;
                    end = self.blocks.block(block).nodes.len();
                }
                _ => {
                    return Walk::Join {
                        found,
                        block,
                        intervals: uncovered.iter().collect(),
                    }
                }
            }
        }
    }

    /// Definitions of `uncovered` bytes of `target` reaching position `end`
    /// of `block`.
    ///
    /// Lookups and phi fills are frames on an explicit stack, so the depth
    /// of nested joins is bounded by memory, not by the thread's stack.
    fn find_definitions(
        &mut self,
        block: BlockId,
        end: usize,
        target: NodeId,
        uncovered: IntervalSet,
    ) -> Vec<MemoryDef> {
        let mut stack = match self.walk(block, end, target, uncovered) {
            Walk::Done(found) => return found,
            Walk::Join {
                found,
                block,
                intervals,
            } => vec![Frame::Lookup {
                found,
                block,
                intervals,
                next: 0,
            }],
        };

        // result of the frame popped last, handed to the frame below it
        let mut returned: Option<Returned> = None;
        loop {
            let Some(frame) = stack.last_mut() else {
                break;
            };

            let action = match frame {
                Frame::Lookup {
                    found,
                    block,
                    intervals,
                    next,
                } => {
                    if let Some(Returned::Def(def)) = returned.take() {
                        push_unique(found, def);
                    }
                    let mut action = None;
                    while action.is_none() && *next < intervals.len() {
                        let (start, end) = intervals[*next];
                        *next += 1;
                        let key = PhiKey {
                            block: *block,
                            target,
                            start,
                            end,
                        };
                        match self.phi_cache.get(&key) {
                            Some(&def) => push_unique(found, def),
                            None => action = Some(Action::Push(self.open_phi(key))),
                        }
                    }
                    action.unwrap_or_else(|| Action::Pop(Returned::Defs(std::mem::take(found))))
                }
                Frame::Phi {
                    key,
                    id,
                    preds,
                    next,
                    operands,
                } => {
                    if let Some(Returned::Defs(defs)) = returned.take() {
                        for def in defs {
                            push_unique(operands, def);
                        }
                    }
                    let mut action = None;
                    while action.is_none() && *next < preds.len() {
                        let pred = preds[*next];
                        *next += 1;
                        let len = self.blocks.block(pred).nodes.len();
                        let uncovered = IntervalSet::single(key.start, key.end);
                        match self.walk(pred, len, target, uncovered) {
                            Walk::Done(defs) => {
                                for def in defs {
                                    push_unique(operands, def);
                                }
                            }
                            Walk::Join {
                                found,
                                block,
                                intervals,
                            } => {
                                action = Some(Action::Push(Frame::Lookup {
                                    found,
                                    block,
                                    intervals,
                                    next: 0,
                                }))
                            }
                        }
                    }
                    match action {
                        Some(action) => action,
                        None => {
                            let operands = std::mem::take(operands);
                            Action::Pop(Returned::Def(self.close_phi(*key, *id, operands)))
                        }
                    }
                }
            };

            match action {
                Action::Push(frame) => stack.push(frame),
                Action::Pop(result) => {
                    stack.pop();
                    returned = Some(result);
                }
            }
        }

        match returned {
            Some(Returned::Defs(found)) => found,
            _ => Vec::new(),
        }
    }

    /// Register an empty phi for `key` before any operand is looked up
    fn open_phi(&mut self, key: PhiKey) -> Frame {
        let id = PhiId(self.phis.len() as u32);
        self.phis.push(MemoryPhi {
            id,
            block: key.block,
            target: key.target,
            start: key.start,
            end: key.end,
            operands: Vec::new(),
            trivial: false,
        });
        self.phi_cache.insert(key, MemoryDef::Phi(id));
        self.stats.phis_created += 1;

        Frame::Phi {
            key,
            id,
            preds: self.blocks.block(key.block).predecessors.clone(),
            next: 0,
            operands: Vec::new(),
        }
    }

    /// Store the operands; a phi with one distinct operand becomes that operand
    fn close_phi(&mut self, key: PhiKey, id: PhiId, operands: Vec<MemoryDef>) -> MemoryDef {
        let distinct: Vec<MemoryDef> = operands
            .iter()
            .copied()
            .filter(|&d| d != MemoryDef::Phi(id))
            .collect();
        let phi = &mut self.phis[id.0 as usize];
        phi.operands = operands;

        if let [only] = distinct.as_slice() {
            phi.trivial = true;
            self.stats.trivial_phis += 1;
            self.phi_cache.insert(key, *only);
            return *only;
        }
        MemoryDef::Phi(id)
    }

    /// SSA-level definitions of `site` reaching the entry of `at`
    fn resolve(&mut self, at: NodeId, site: DefSite) -> Vec<MemoryDef> {
        let Some((block, pos)) = self.blocks.position(at) else {
            return Vec::new();
        };
        let site = self.accesses.normalize(site);

        if site.target != NodeId::UNKNOWN_MEMORY {
            let uncovered = match known_interval(site.offset, site.len) {
                Some((start, end)) => IntervalSet::single(start, end),
                None => IntervalSet::full(),
            };
            return self.find_definitions(block, pos, site.target, uncovered);
        }

        // a read of unknown memory reads every object
        let mut found = Vec::new();
        for object in self.written_objects.clone() {
            for def in self.find_definitions(block, pos, object, IntervalSet::full()) {
                push_unique(&mut found, def);
            }
        }
        found
    }

    /// Replace phis by the writes they merge
    fn expand(&self, defs: &[MemoryDef]) -> Vec<NodeId> {
        let mut visited = vec![false; self.phis.len()];
        let mut writes = Vec::new();
        let mut stack: Vec<MemoryDef> = defs.to_vec();

        while let Some(def) = stack.pop() {
            match def {
                MemoryDef::Write(node) => writes.push(node),
                MemoryDef::Phi(id) => {
                    let idx = id.0 as usize;
                    if idx < visited.len() && !visited[idx] {
                        visited[idx] = true;
                        stack.extend(self.phis[idx].operands.iter().copied());
                    }
                }
            }
        }

        writes.sort_unstable();
        writes.dedup();
        writes
    }
}

impl DataDependenceEngine for MemorySSATransformation {
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

        self.accesses = AccessTable::build(&self.graph, self.options.field_insensitive);
        let reachable = self.graph.reachable_from_root();
        self.blocks = BasicBlocks::build(&self.graph, &reachable);
        self.written_objects = self.accesses.written_objects();
        self.stats.blocks = self.blocks.len();

        debug!(
            "Memory SSA: {} blocks, {} written objects",
            self.blocks.len(),
            self.written_objects.len()
        );

        for node in self.graph.reverse_postorder() {
            let uses = self.accesses.uses(node).to_vec();
            if uses.is_empty() {
                continue;
            }
            let mut defs = Vec::new();
            for site in uses {
                for def in self.resolve(node, site) {
                    push_unique(&mut defs, def);
                }
            }
            let writes = self.expand(&defs);
            self.use_memory_defs.insert(node, defs);
            self.use_definitions.insert(node, writes);
        }

        self.stats.resolved_uses = self.use_definitions.len();
        self.done = true;

        debug!(
            "Memory SSA built: {} uses, {} phis ({} trivial)",
            self.stats.resolved_uses, self.stats.phis_created, self.stats.trivial_phis
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
        self.check_ready(at)?;
        if !self.graph.contains(mem) {
            return Err(DataDependenceError::UnknownNode { id: mem });
        }
        let defs = self.resolve(at, DefSite::new(mem, offset, len));
        Ok(self.expand(&defs))
    }

    fn get_definitions_for_use(&mut self, use_node: NodeId) -> DataDependenceResult<Vec<NodeId>> {
        self.check_ready(use_node)?;
        Ok(self
            .use_definitions
            .get(&use_node)
            .cloned()
            .unwrap_or_default())
    }
}
