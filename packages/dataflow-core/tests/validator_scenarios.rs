//! Points-to graph validator scenarios

mod common;

use common::PointerGraphBuilder;
use dataflow_core::features::points_to::infrastructure::diagnostic::{
    CTX_DUPLICATE_OPERAND, CTX_NO_PREDECESSORS,
};
use dataflow_core::features::read_write_graph::{DefSite, RWNodeType, ReadWriteGraph};
use dataflow_core::{
    AnalysisError, DataDependenceAnalysis, Diagnostic, PSNodeId, PSNodeType, PointerGraph,
    PointerGraphValidator,
};
use pretty_assertions::assert_eq;

#[test]
fn test_store_feeding_load_is_valid_and_defines_it() {
    // p = alloc; x = alloc; *p = x; y = *p
    let mut b = PointerGraphBuilder::new();
    let p = b.then(PSNodeType::Alloc, vec![]);
    let x = b.then(PSNodeType::Alloc, vec![]);
    b.then(PSNodeType::Store, vec![x, p]);
    b.then(PSNodeType::Load, vec![p]);
    let ps = b.build();

    let report = PointerGraphValidator::new(&ps).validate();
    assert!(!report.is_invalid(), "{}", report);
    assert_eq!(report.errors(), "");
    assert!(report.ensure_valid().is_ok());

    // the same program as memory accesses
    let mut rw = ReadWriteGraph::new();
    let obj = rw.add_node(RWNodeType::Alloc);
    let store = rw.add_store(DefSite::known(obj, 0, 8), true);
    let load = rw.add_load(DefSite::known(obj, 0, 8));
    rw.add_path(&[obj, store, load]);
    rw.set_root(obj);

    let mut dda = DataDependenceAnalysis::with_defaults(rw);
    dda.run().unwrap();
    assert_eq!(dda.get_definitions_for_use(load).unwrap(), vec![store]);
}

#[test]
fn test_phi_with_duplicate_operand() {
    let mut b = PointerGraphBuilder::new();
    let a = b.then(PSNodeType::Alloc, vec![]);
    let phi = b.then(PSNodeType::Phi, vec![a, a]);
    let ps = b.build();

    let validator = PointerGraphValidator::new(&ps);
    let operands = validator.check_operands();
    assert_eq!(
        operands.errors(),
        format!(
            "Invalid number of operands for PHI with ID {}\n  - operands: [{} {}]\n({})\n",
            phi, a, a, CTX_DUPLICATE_OPERAND
        )
    );
    let report = validator.validate();
    assert!(report.is_invalid());
    assert!(matches!(
        report.ensure_valid(),
        Err(AnalysisError::InvalidPointerGraph { count: 1 })
    ));
}

#[test]
fn test_constant_with_operand() {
    let mut b = PointerGraphBuilder::new();
    let a = b.then(PSNodeType::Alloc, vec![]);
    let c = b.detached(PSNodeType::Constant, vec![a]);
    let ps = b.build();

    let report = PointerGraphValidator::new(&ps).validate();
    // flagged for operands only: CONSTANT may float
    assert_eq!(
        report.diagnostics,
        vec![Diagnostic::InvalidOperands {
            node_type: PSNodeType::Constant,
            id: c,
            operands: vec![a],
            context: None,
        }]
    );
}

#[test]
fn test_node_without_predecessors() {
    let mut b = PointerGraphBuilder::new();
    b.then(PSNodeType::Alloc, vec![]);
    let orphan = b.detached(PSNodeType::Noop, vec![]);
    b.detached(PSNodeType::Function, vec![]);
    b.detached(PSNodeType::NullAddr, vec![]);
    b.detached(PSNodeType::UnknownMem, vec![]);
    let ps = b.build();

    let report = PointerGraphValidator::new(&ps).check_edges();
    assert_eq!(
        report.errors(),
        format!(
            "Invalid number of edges for NOOP with ID {id}\n({})\nUnreachable NOOP with ID {id}\n",
            CTX_NO_PREDECESSORS,
            id = orphan
        )
    );
}

#[test]
fn test_all_violations_in_one_pass() {
    let mut b = PointerGraphBuilder::new();
    let a = b.then(PSNodeType::Alloc, vec![]);
    b.then(PSNodeType::Load, vec![]);
    b.then(PSNodeType::Store, vec![a]);
    b.detached(PSNodeType::Gep, vec![a]);
    let ps = b.build();

    let report = PointerGraphValidator::new(&ps).validate();
    // LOAD and STORE arity, GEP without predecessors and unreachable
    assert_eq!(report.len(), 4);
}

#[test]
fn test_validate_is_repeatable() {
    let mut b = PointerGraphBuilder::new();
    let a = b.then(PSNodeType::Alloc, vec![]);
    b.detached(PSNodeType::Phi, vec![]);
    b.then(PSNodeType::Cast, vec![a, a]);
    let ps = b.build();

    let validator = PointerGraphValidator::new(&ps);
    let first = validator.validate();
    let second = validator.validate();
    assert_eq!(first, second);
    assert_eq!(first.errors(), second.errors());
}

#[test]
fn test_malformed_json_graph_is_reported_not_fatal() {
    let mut b = PointerGraphBuilder::new();
    let a = b.then(PSNodeType::Alloc, vec![]);
    b.then(PSNodeType::Load, vec![a]);
    let graph = b.build();

    let mut value = serde_json::to_value(&graph).unwrap();
    value["root"] = serde_json::json!(40);
    value["nodes"][1]["id"] = serde_json::json!(30);
    value["nodes"][2]["operands"] = serde_json::json!([50]);
    let decoded: PointerGraph = serde_json::from_value(value).unwrap();

    let report = PointerGraphValidator::new(&decoded).validate();
    assert!(report.is_invalid());
    let kinds: Vec<&str> = report
        .diagnostics
        .iter()
        .map(|d| match d {
            Diagnostic::InvalidOperands { .. } => "operands",
            Diagnostic::MissingOperand { .. } => "missing-operand",
            Diagnostic::InvalidEdges { .. } => "edges",
            Diagnostic::Unreachable { .. } => "unreachable",
            Diagnostic::Misplaced { .. } => "misplaced",
            Diagnostic::InvalidRoot { .. } => "root",
        })
        .collect();
    // the unusable root leaves ENTRY without predecessors and nothing reachable
    assert_eq!(
        kinds,
        vec![
            "missing-operand",
            "root",
            "edges",
            "misplaced",
            "unreachable",
            "unreachable",
            "unreachable",
        ]
    );
    assert!(report.diagnostics.iter().any(|d| d.node() == PSNodeId(40)));
    assert!(report.errors().contains("Invalid operand 50 for LOAD with ID 2"));
    assert_eq!(PointerGraphValidator::new(&decoded).validate(), report);
}
