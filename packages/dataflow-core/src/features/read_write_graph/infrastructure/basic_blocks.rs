/*
 * Basic-block partition of a Read-Write Graph
 *
 * Groups reachable nodes into maximal straight-line chains:
 * a chain continues from `n` to `s` while `n` has exactly one successor
 * `s`, `s` has exactly one reachable predecessor and `s` is not the root.
 *
 * Only nodes reachable from the root are assigned to blocks; edges
 * coming from unreachable nodes are dropped.
 */

use crate::features::read_write_graph::domain::{NodeId, ReadWriteGraph};
use rustc_hash::FxHashMap;

/// Block index in `BasicBlocks::blocks`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub u32);

impl BlockId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone)]
pub struct BasicBlock {
    pub id: BlockId,
    pub nodes: Vec<NodeId>,
    pub predecessors: Vec<BlockId>,
    pub successors: Vec<BlockId>,
}

#[derive(Debug, Clone, Default)]
pub struct BasicBlocks {
    pub blocks: Vec<BasicBlock>,
    /// node → (block, position inside the block)
    position: FxHashMap<NodeId, (BlockId, usize)>,
    entry: Option<BlockId>,
}

impl BasicBlocks {
    /// Partition `graph`. `reachable` is `graph.reachable_from_root()`.
    pub fn build(graph: &ReadWriteGraph, reachable: &[bool]) -> Self {
        let mut result = BasicBlocks::default();
        let Some(root) = graph.root() else {
            return result;
        };

        let is_reachable = |id: NodeId| reachable.get(id.index()).copied().unwrap_or(false);
        let reachable_preds = |id: NodeId| -> Vec<NodeId> {
            graph
                .node(id)
                .map(|n| n.predecessors().iter().copied().filter(|&p| is_reachable(p)).collect())
                .unwrap_or_default()
        };

        let continues_chain = |from: NodeId| -> Option<NodeId> {
            let node = graph.node(from)?;
            let [succ] = node.successors() else {
                return None;
            };
            let succ = *succ;
            if succ == root || succ == from {
                return None;
            }
            let preds = reachable_preds(succ);
            (preds.len() == 1 && preds[0] == from).then_some(succ)
        };

        // chain leaders: every reachable node that is not the continuation of a chain
        let order = graph.reverse_postorder();
        let mut is_continuation = vec![false; graph.len()];
        for &id in &order {
            if let Some(next) = continues_chain(id) {
                is_continuation[next.index()] = true;
            }
        }

        for &leader in order.iter().filter(|id| !is_continuation[id.index()]) {
            let block_id = BlockId(result.blocks.len() as u32);
            let mut nodes = vec![leader];
            let mut cur = leader;
            while let Some(next) = continues_chain(cur) {
                nodes.push(next);
                cur = next;
            }
            for (pos, &n) in nodes.iter().enumerate() {
                result.position.insert(n, (block_id, pos));
            }
            result.blocks.push(BasicBlock {
                id: block_id,
                nodes,
                predecessors: Vec::new(),
                successors: Vec::new(),
            });
        }

        // block edges: from the last node of each block
        for idx in 0..result.blocks.len() {
            let Some(&last) = result.blocks[idx].nodes.last() else {
                continue;
            };
            let from = BlockId(idx as u32);
            let succs: Vec<BlockId> = graph
                .node(last)
                .map(|n| n.successors().to_vec())
                .unwrap_or_default()
                .into_iter()
                .filter_map(|s| result.position.get(&s).map(|&(b, _)| b))
                .collect();
            for to in succs {
                if !result.blocks[idx].successors.contains(&to) {
                    result.blocks[idx].successors.push(to);
                    result.blocks[to.index()].predecessors.push(from);
                }
            }
        }

        result.entry = result.position.get(&root).map(|&(b, _)| b);
        result
    }

    #[inline]
    pub fn entry(&self) -> Option<BlockId> {
        self.entry
    }

    /// Block and position of `node`, `None` if unreachable
    #[inline]
    pub fn position(&self, node: NodeId) -> Option<(BlockId, usize)> {
        self.position.get(&node).copied()
    }

    #[inline]
    pub fn block(&self, id: BlockId) -> &BasicBlock {
        &self.blocks[id.index()]
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}
