//! Test data builders

use dataflow_core::features::points_to::{PSNodeId, PSNodeType, PointerGraph};
use dataflow_core::features::read_write_graph::{DefSite, NodeId, RWNodeType, ReadWriteGraph};
use dataflow_core::Offset;
use proptest::prelude::*;

// ============================================================================
// Read-Write Graph
// ============================================================================

/// `(object index, offset, len)`; object index == number of objects means
/// UNKNOWN_MEMORY, `None` means unknown
#[derive(Debug, Clone)]
pub struct AccessSpec {
    pub object: usize,
    pub offset: Option<u64>,
    pub len: Option<u64>,
}

#[derive(Debug, Clone)]
pub enum NodeSpec {
    Write { site: AccessSpec, strong: bool },
    Read(AccessSpec),
    Noop,
}

/// Shape of a random program: a spine `program[0..spine]` after the
/// object allocations, plus arbitrary extra edges (branches, loops,
/// detached nodes).
#[derive(Debug, Clone)]
pub struct RwGraphSpec {
    pub objects: usize,
    pub nodes: Vec<NodeSpec>,
    pub spine: usize,
    pub extra_edges: Vec<(usize, usize)>,
}

pub struct BuiltRwGraph {
    pub graph: ReadWriteGraph,
    pub objects: Vec<NodeId>,
    pub program: Vec<NodeId>,
}

impl BuiltRwGraph {
    /// Object referenced by an `AccessSpec` index
    pub fn object(&self, index: usize) -> NodeId {
        self.objects
            .get(index)
            .copied()
            .unwrap_or(NodeId::UNKNOWN_MEMORY)
    }
}

fn offset(v: Option<u64>) -> Offset {
    v.map(Offset::new).unwrap_or(Offset::UNKNOWN)
}

impl RwGraphSpec {
    pub fn site(&self, built: &BuiltRwGraph, access: &AccessSpec) -> DefSite {
        DefSite::new(built.object(access.object), offset(access.offset), offset(access.len))
    }

    pub fn build(&self) -> BuiltRwGraph {
        let mut built = BuiltRwGraph {
            graph: ReadWriteGraph::new(),
            objects: Vec::new(),
            program: Vec::new(),
        };
        for _ in 0..self.objects {
            let obj = built.graph.add_node(RWNodeType::Alloc);
            built.objects.push(obj);
        }

        for spec in &self.nodes {
            let id = match spec {
                NodeSpec::Write { site, strong } => {
                    let site = self.site(&built, site);
                    built.graph.add_store(site, *strong)
                }
                NodeSpec::Read(site) => {
                    let site = self.site(&built, site);
                    built.graph.add_load(site)
                }
                NodeSpec::Noop => built.graph.add_node(RWNodeType::Noop),
            };
            built.program.push(id);
        }

        let mut spine: Vec<NodeId> = built.objects.clone();
        spine.extend(built.program.iter().take(self.spine).copied());
        built.graph.add_path(&spine);
        for &(from, to) in &self.extra_edges {
            built.graph.add_edge(built.program[from], built.program[to]);
        }
        built.graph.set_root(built.objects[0]);
        built
    }
}

pub fn access_strategy(objects: usize) -> impl Strategy<Value = AccessSpec> {
    (
        0..=objects,
        prop::option::weighted(0.85, 0u64..16),
        prop::option::weighted(0.85, 1u64..8),
    )
        .prop_map(|(object, offset, len)| AccessSpec {
            object,
            offset,
            len,
        })
}

pub fn node_strategy(objects: usize) -> impl Strategy<Value = NodeSpec> {
    prop_oneof![
        3 => (access_strategy(objects), any::<bool>())
            .prop_map(|(site, strong)| NodeSpec::Write { site, strong }),
        3 => access_strategy(objects).prop_map(NodeSpec::Read),
        1 => Just(NodeSpec::Noop),
    ]
}

pub fn rw_graph_strategy() -> impl Strategy<Value = RwGraphSpec> {
    (1usize..=3, 1usize..=12)
        .prop_flat_map(|(objects, n)| {
            (
                Just(objects),
                prop::collection::vec(node_strategy(objects), n),
                0..=n,
                prop::collection::vec((0..n, 0..n), 0..=2 * n),
            )
        })
        .prop_map(|(objects, nodes, spine, extra_edges)| RwGraphSpec {
            objects,
            nodes,
            spine,
            extra_edges,
        })
}

/// A random query `(object index, offset, len)`
pub fn query_strategy() -> impl Strategy<Value = AccessSpec> {
    access_strategy(3)
}

// ============================================================================
// Points-to graph
// ============================================================================

/// Builder for `PointerGraph` test fixtures
#[derive(Debug, Default)]
pub struct PointerGraphBuilder {
    graph: PointerGraph,
    last: Option<PSNodeId>,
}

impl PointerGraphBuilder {
    /// Start with an ENTRY node set as root
    pub fn new() -> Self {
        let mut graph = PointerGraph::new();
        let entry = graph.add_node(PSNodeType::Entry, vec![]);
        graph.set_root(entry);
        Self {
            graph,
            last: Some(entry),
        }
    }

    pub fn root(&self) -> PSNodeId {
        self.graph.root().unwrap_or(PSNodeId(0))
    }

    /// Append a node to the main chain
    pub fn then(&mut self, node_type: PSNodeType, operands: Vec<PSNodeId>) -> PSNodeId {
        let id = self.graph.add_node(node_type, operands);
        if let Some(last) = self.last {
            self.graph.add_edge(last, id);
        }
        self.last = Some(id);
        id
    }

    /// Add a node outside the chain
    pub fn detached(&mut self, node_type: PSNodeType, operands: Vec<PSNodeId>) -> PSNodeId {
        self.graph.add_node(node_type, operands)
    }

    pub fn graph_mut(&mut self) -> &mut PointerGraph {
        &mut self.graph
    }

    pub fn build(self) -> PointerGraph {
        self.graph
    }
}

pub fn ps_type_strategy() -> impl Strategy<Value = PSNodeType> {
    prop::sample::select(PSNodeType::ALL.to_vec())
}

/// Random points-to graph: node types, operand lists and edge lists
/// (edges may be one-sided)
#[derive(Debug, Clone)]
pub struct PointerGraphSpec {
    pub types: Vec<PSNodeType>,
    pub operands: Vec<Vec<usize>>,
    /// `(from, to, kind)`: 0 = symmetric, 1 = successor only, 2 = predecessor only
    pub edges: Vec<(usize, usize, u8)>,
    pub root: usize,
}

impl PointerGraphSpec {
    pub fn build(&self) -> PointerGraph {
        let mut graph = PointerGraph::new();
        for (t, ops) in self.types.iter().zip(&self.operands) {
            let ops = ops.iter().map(|&i| PSNodeId(i as u32)).collect();
            graph.add_node(*t, ops);
        }
        for &(from, to, kind) in &self.edges {
            let (from, to) = (PSNodeId(from as u32), PSNodeId(to as u32));
            match kind {
                0 => graph.add_edge(from, to),
                1 => graph.add_successor_only(from, to),
                _ => graph.add_predecessor_only(to, from),
            };
        }
        graph.set_root(PSNodeId(self.root as u32));
        graph
    }
}

pub fn pointer_graph_strategy() -> impl Strategy<Value = PointerGraphSpec> {
    (1usize..=10)
        .prop_flat_map(|n| {
            (
                prop::collection::vec(ps_type_strategy(), n),
                prop::collection::vec(prop::collection::vec(0..n, 0..=3), n),
                prop::collection::vec(
                    (0..n, 0..n, prop_oneof![4 => Just(0u8), 1 => Just(1u8), 1 => Just(2u8)]),
                    0..=2 * n,
                ),
                0..n,
            )
        })
        .prop_map(|(types, operands, edges, root)| PointerGraphSpec {
            types,
            operands,
            edges,
            root,
        })
}
