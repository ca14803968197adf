//! Per-node memory accesses as the engines see them
//!
//! Field-insensitive mode widens every site to the whole object here,
//! once, so the engines never look at raw descriptors.

use crate::features::read_write_graph::domain::{DefSite, NodeId, ReadWriteGraph};

#[derive(Debug, Clone, Default)]
pub struct AccessTable {
    /// `(site, is_strong)` per node, in `RWNode::writes` order
    writes: Vec<Vec<(DefSite, bool)>>,
    uses: Vec<Vec<DefSite>>,
    field_insensitive: bool,
}

impl AccessTable {
    pub fn build(graph: &ReadWriteGraph, field_insensitive: bool) -> Self {
        let norm = |ds: &DefSite| if field_insensitive { ds.widened() } else { *ds };
        let mut table = AccessTable {
            writes: Vec::with_capacity(graph.len()),
            uses: Vec::with_capacity(graph.len()),
            field_insensitive,
        };
        for node in graph.nodes() {
            table
                .writes
                .push(node.writes().map(|(ds, strong)| (norm(ds), strong)).collect());
            table.uses.push(node.uses.iter().map(norm).collect());
        }
        table
    }

    /// Apply the same normalization to a query
    #[inline]
    pub fn normalize(&self, site: DefSite) -> DefSite {
        if self.field_insensitive {
            site.widened()
        } else {
            site
        }
    }

    #[inline]
    pub fn writes(&self, node: NodeId) -> &[(DefSite, bool)] {
        self.writes.get(node.index()).map(Vec::as_slice).unwrap_or(&[])
    }

    #[inline]
    pub fn write_site(&self, node: NodeId, site: u32) -> Option<&DefSite> {
        self.writes(node).get(site as usize).map(|(ds, _)| ds)
    }

    /// Strong writes only
    pub fn overwrites(&self, node: NodeId) -> impl Iterator<Item = &DefSite> + '_ {
        self.writes(node)
            .iter()
            .filter_map(|(ds, strong)| if *strong { Some(ds) } else { None })
    }

    #[inline]
    pub fn uses(&self, node: NodeId) -> &[DefSite] {
        self.uses.get(node.index()).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Objects targeted by at least one write
    pub fn written_objects(&self) -> Vec<NodeId> {
        let mut objects: Vec<NodeId> = self
            .writes
            .iter()
            .flat_map(|sites| sites.iter().map(|(ds, _)| ds.target))
            .collect();
        objects.sort_unstable();
        objects.dedup();
        objects
    }
}
