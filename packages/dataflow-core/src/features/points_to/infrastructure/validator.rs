/*
 * Points-to graph validator
 *
 * Read-only structural checks. Nothing stops at the first violation:
 * every pass walks the whole graph and returns all diagnostics.
 *
 * check_operands:
 *   - fixed-arity types must have exactly that many operands
 *   - PHI needs at least one operand and no operand twice
 *   - every operand must be a node of the graph (reported on its own,
 *     independent of the operand count)
 *
 * check_edges:
 *   - the root must be a node of the graph
 *   - every node must sit at the position its id names
 *   - a node without predecessors must be the root or floatable
 *   - succ ∈ n.successors  ⇒ n ∈ succ.predecessors
 *   - pred ∈ n.predecessors ⇒ n ∈ pred.successors
 *   - every non-floatable node is in the BFS closure of the root
 *
 * Edges and operands name arena positions, so reachability is tracked by
 * position even for nodes whose id is wrong.
 *
 * Floatable: FUNCTION, CONSTANT, UNKNOWN_MEM, NULL_ADDR.
 */

use super::diagnostic::{
    Diagnostic, ValidationReport, CTX_DUPLICATE_OPERAND, CTX_MISSING_PREDECESSOR,
    CTX_MISSING_SUCCESSOR, CTX_NO_PREDECESSORS,
};
use crate::config::ValidatorOptions;
use crate::features::points_to::domain::{Arity, PSNode, PSNodeId, PointerGraph};
use std::collections::VecDeque;
use tracing::{debug, warn};

pub struct PointerGraphValidator<'a> {
    graph: &'a PointerGraph,
    options: ValidatorOptions,
}

impl<'a> PointerGraphValidator<'a> {
    pub fn new(graph: &'a PointerGraph) -> Self {
        Self {
            graph,
            options: ValidatorOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ValidatorOptions) -> Self {
        self.options = options;
        self
    }

    /// Run both passes. Every call starts from an empty report.
    pub fn validate(&self) -> ValidationReport {
        let mut report = self.check_operands();
        report.extend(self.check_edges());

        debug!(
            "Validated points-to graph: {} nodes, {} diagnostics",
            self.graph.len(),
            report.len()
        );
        report
    }

    pub fn check_operands(&self) -> ValidationReport {
        let mut report = ValidationReport::default();

        for node in self.graph.nodes() {
            if let Some(diagnostic) = check_arity(node) {
                report.diagnostics.push(diagnostic);
            }
            for &op in &node.operands {
                if !self.graph.contains(op) {
                    report.diagnostics.push(Diagnostic::missing_operand(node, op));
                }
            }
        }

        log_all(&report);
        report
    }

    pub fn check_edges(&self) -> ValidationReport {
        let mut report = ValidationReport::default();
        let root = self.graph.root();

        if let Some(id) = root.filter(|&r| !self.graph.contains(r)) {
            report.diagnostics.push(Diagnostic::InvalidRoot { id });
        }

        for (position, node) in self.graph.nodes().enumerate() {
            let here = PSNodeId(position as u32);
            if node.id() != here {
                report.diagnostics.push(Diagnostic::misplaced(node, position));
            }

            if self.options.check_connectivity
                && node.predecessors().is_empty()
                && Some(here) != root
                && !node.node_type().can_float()
            {
                report
                    .diagnostics
                    .push(Diagnostic::invalid_edges(node, CTX_NO_PREDECESSORS));
            }

            for &succ in node.successors() {
                let linked = self
                    .graph
                    .node(succ)
                    .is_some_and(|s| s.predecessors().contains(&here));
                if !linked {
                    report
                        .diagnostics
                        .push(Diagnostic::invalid_edges(node, CTX_MISSING_PREDECESSOR));
                }
            }

            for &pred in node.predecessors() {
                let linked = self
                    .graph
                    .node(pred)
                    .is_some_and(|p| p.successors().contains(&here));
                if !linked {
                    report
                        .diagnostics
                        .push(Diagnostic::invalid_edges(node, CTX_MISSING_SUCCESSOR));
                }
            }
        }

        if self.options.check_connectivity {
            let reachable = self.reachable_from_root();
            for (node, &seen) in self.graph.nodes().zip(&reachable) {
                if !seen && !node.node_type().can_float() {
                    report.diagnostics.push(Diagnostic::unreachable(node));
                }
            }
        }

        log_all(&report);
        report
    }

    /// Breadth-first closure of the root over successor edges.
    ///
    /// Indexed by arena position. All false when the root is missing or
    /// names no node.
    pub fn reachable_from_root(&self) -> Vec<bool> {
        let mut reachable = vec![false; self.graph.len()];
        let Some(root) = self.graph.root() else {
            return reachable;
        };
        match reachable.get_mut(root.index()) {
            Some(seen) => *seen = true,
            None => return reachable,
        }

        let mut queue = VecDeque::from([root]);
        while let Some(id) = queue.pop_front() {
            let Some(node) = self.graph.node(id) else {
                continue;
            };
            for &succ in node.successors() {
                if let Some(seen) = reachable.get_mut(succ.index()) {
                    if !*seen {
                        *seen = true;
                        queue.push_back(succ);
                    }
                }
            }
        }
        reachable
    }
}

fn check_arity(node: &PSNode) -> Option<Diagnostic> {
    let count = node.operands.len();
    match node.node_type().arity() {
        Arity::Merge if count == 0 => Some(Diagnostic::invalid_operands(node, None)),
        Arity::Merge if node.has_duplicate_operand() => {
            Some(Diagnostic::invalid_operands(node, Some(CTX_DUPLICATE_OPERAND)))
        }
        Arity::Exactly(n) if count != n => Some(Diagnostic::invalid_operands(node, None)),
        _ => None,
    }
}

fn log_all(report: &ValidationReport) {
    for diagnostic in &report.diagnostics {
        warn!("{}", diagnostic.to_string().trim_end());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::points_to::domain::PSNodeType;
    use crate::features::points_to::infrastructure::diagnostic::{
        CTX_INVALID_ROOT, CTX_MISSING_OPERAND,
    };

    #[test]
    fn test_well_formed_graph() {
        let mut g = PointerGraph::new();
        let entry = g.add_node(PSNodeType::Entry, vec![]);
        let a = g.add_node(PSNodeType::Alloc, vec![]);
        let p = g.add_node(PSNodeType::Alloc, vec![]);
        let s = g.add_node(PSNodeType::Store, vec![a, p]);
        let l = g.add_node(PSNodeType::Load, vec![p]);
        g.add_node(PSNodeType::NullAddr, vec![]);
        g.add_path(&[entry, a, p, s, l]);
        g.set_root(entry);

        let report = PointerGraphValidator::new(&g).validate();
        assert!(!report.is_invalid(), "{}", report);
    }

    #[test]
    fn test_arity_violations_all_reported() {
        let mut g = PointerGraph::new();
        let root = g.add_node(PSNodeType::Entry, vec![]);
        let gep = g.add_node(PSNodeType::Gep, vec![]);
        let store = g.add_node(PSNodeType::Store, vec![root]);
        let phi = g.add_node(PSNodeType::Phi, vec![]);
        g.add_path(&[root, gep, store, phi]);
        g.set_root(root);

        let report = PointerGraphValidator::new(&g).check_operands();
        let flagged: Vec<PSNodeId> = report.diagnostics.iter().map(Diagnostic::node).collect();
        assert_eq!(flagged, vec![gep, store, phi]);
    }

    #[test]
    fn test_dangling_operand() {
        let mut g = PointerGraph::new();
        let root = g.add_node(PSNodeType::Entry, vec![]);
        let load = g.add_node(PSNodeType::Load, vec![PSNodeId(42)]);
        g.add_edge(root, load);
        g.set_root(root);

        let report = PointerGraphValidator::new(&g).check_operands();
        assert_eq!(
            report.diagnostics,
            vec![Diagnostic::MissingOperand {
                node_type: PSNodeType::Load,
                id: load,
                operand: PSNodeId(42),
            }]
        );
        assert_eq!(report.diagnostics[0].context(), Some(CTX_MISSING_OPERAND));
    }

    #[test]
    fn test_dangling_operand_and_bad_arity_reported_apart() {
        let mut g = PointerGraph::new();
        let root = g.add_node(PSNodeType::Entry, vec![]);
        let store = g.add_node(PSNodeType::Store, vec![PSNodeId(42)]);
        g.add_edge(root, store);
        g.set_root(root);

        let report = PointerGraphValidator::new(&g).check_operands();
        assert_eq!(report.len(), 2);
        assert!(matches!(report.diagnostics[0], Diagnostic::InvalidOperands { .. }));
        assert!(matches!(report.diagnostics[1], Diagnostic::MissingOperand { .. }));
    }

    #[test]
    fn test_root_outside_arena_is_reported() {
        let g: PointerGraph = serde_json::from_str(
            r#"{"nodes":[{"id":0,"node_type":"ENTRY","operands":[],"successors":[],"predecessors":[]}],"root":5}"#,
        )
        .unwrap();

        let report = PointerGraphValidator::new(&g).validate();
        // the root is unusable, so ENTRY has no predecessors and is unreachable
        let contexts: Vec<Option<&str>> =
            report.diagnostics.iter().map(Diagnostic::context).collect();
        assert_eq!(
            contexts,
            vec![Some(CTX_INVALID_ROOT), Some(CTX_NO_PREDECESSORS), None]
        );
        assert_eq!(report.diagnostics[0].node(), PSNodeId(5));
    }

    #[test]
    fn test_node_id_not_matching_position() {
        let g: PointerGraph = serde_json::from_str(
            r#"{"nodes":[{"id":7,"node_type":"ENTRY","operands":[],"successors":[],"predecessors":[]}],"root":0}"#,
        )
        .unwrap();

        let report = PointerGraphValidator::new(&g).validate();
        assert_eq!(
            report.diagnostics,
            vec![Diagnostic::Misplaced {
                node_type: PSNodeType::Entry,
                id: PSNodeId(7),
                position: 0,
            }]
        );
    }

    #[test]
    fn test_missing_back_edges_both_directions() {
        let mut g = PointerGraph::new();
        let root = g.add_node(PSNodeType::Entry, vec![]);
        let a = g.add_node(PSNodeType::Noop, vec![]);
        let b = g.add_node(PSNodeType::Noop, vec![]);
        g.add_edge(root, a);
        g.add_edge(root, b);
        g.add_successor_only(a, b);
        g.add_predecessor_only(a, b);
        g.set_root(root);

        let report = PointerGraphValidator::new(&g).check_edges();
        let contexts: Vec<(PSNodeId, Option<&str>)> = report
            .diagnostics
            .iter()
            .map(|d| (d.node(), d.context()))
            .collect();
        // a -> b lacks the back edge; a lists b as predecessor without b -> a
        assert_eq!(
            contexts,
            vec![
                (a, Some(CTX_MISSING_PREDECESSOR)),
                (a, Some(CTX_MISSING_SUCCESSOR)),
            ]
        );
    }

    #[test]
    fn test_unreachable_cycle() {
        let mut g = PointerGraph::new();
        let root = g.add_node(PSNodeType::Entry, vec![]);
        let x = g.add_node(PSNodeType::Phi, vec![root]);
        let y = g.add_node(PSNodeType::Phi, vec![root]);
        g.add_edge(x, y);
        g.add_edge(y, x);
        g.set_root(root);

        let report = PointerGraphValidator::new(&g).check_edges();
        let unreachable: Vec<PSNodeId> = report
            .diagnostics
            .iter()
            .filter(|d| matches!(d, Diagnostic::Unreachable { .. }))
            .map(Diagnostic::node)
            .collect();
        assert_eq!(unreachable, vec![x, y]);
    }

    #[test]
    fn test_connectivity_switch() {
        let mut g = PointerGraph::new();
        let root = g.add_node(PSNodeType::Entry, vec![]);
        g.add_node(PSNodeType::Alloc, vec![]);
        g.set_root(root);

        assert_eq!(PointerGraphValidator::new(&g).check_edges().len(), 2);
        let relaxed = PointerGraphValidator::new(&g)
            .with_options(ValidatorOptions::default().check_connectivity(false));
        assert!(!relaxed.validate().is_invalid());
    }

    #[test]
    fn test_no_root_everything_unreachable() {
        let mut g = PointerGraph::new();
        g.add_node(PSNodeType::Alloc, vec![]);
        g.add_node(PSNodeType::Function, vec![]);

        let report = PointerGraphValidator::new(&g).check_edges();
        // no predecessors + unreachable for ALLOC; FUNCTION floats
        assert_eq!(report.len(), 2);
    }
}
