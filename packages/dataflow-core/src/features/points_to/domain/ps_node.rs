//! Points-to graph nodes

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Arena index of a `PSNode`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PSNodeId(pub u32);

impl PSNodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PSNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of pointer operation a node models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PSNodeType {
    Alloc,
    DynAlloc,
    Load,
    Store,
    Gep,
    Phi,
    Cast,
    Function,
    Call,
    CallFuncptr,
    CallReturn,
    Entry,
    Return,
    Constant,
    Noop,
    Memcpy,
    NullAddr,
    UnknownMem,
    InvalidateLocals,
    InvalidateObject,
    Free,
}

/// Operand-count contract of a node type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exactly(usize),
    /// At least one operand, no operand twice
    Merge,
    Unchecked,
}

impl PSNodeType {
    pub const ALL: [PSNodeType; 21] = [
        PSNodeType::Alloc,
        PSNodeType::DynAlloc,
        PSNodeType::Load,
        PSNodeType::Store,
        PSNodeType::Gep,
        PSNodeType::Phi,
        PSNodeType::Cast,
        PSNodeType::Function,
        PSNodeType::Call,
        PSNodeType::CallFuncptr,
        PSNodeType::CallReturn,
        PSNodeType::Entry,
        PSNodeType::Return,
        PSNodeType::Constant,
        PSNodeType::Noop,
        PSNodeType::Memcpy,
        PSNodeType::NullAddr,
        PSNodeType::UnknownMem,
        PSNodeType::InvalidateLocals,
        PSNodeType::InvalidateObject,
        PSNodeType::Free,
    ];

    /// Name used in diagnostics
    pub fn as_str(&self) -> &'static str {
        match self {
            PSNodeType::Alloc => "ALLOC",
            PSNodeType::DynAlloc => "DYN_ALLOC",
            PSNodeType::Load => "LOAD",
            PSNodeType::Store => "STORE",
            PSNodeType::Gep => "GEP",
            PSNodeType::Phi => "PHI",
            PSNodeType::Cast => "CAST",
            PSNodeType::Function => "FUNCTION",
            PSNodeType::Call => "CALL",
            PSNodeType::CallFuncptr => "CALL_FUNCPTR",
            PSNodeType::CallReturn => "CALL_RETURN",
            PSNodeType::Entry => "ENTRY",
            PSNodeType::Return => "RETURN",
            PSNodeType::Constant => "CONSTANT",
            PSNodeType::Noop => "NOOP",
            PSNodeType::Memcpy => "MEMCPY",
            PSNodeType::NullAddr => "NULL_ADDR",
            PSNodeType::UnknownMem => "UNKNOWN_MEM",
            PSNodeType::InvalidateLocals => "INVALIDATE_LOCALS",
            PSNodeType::InvalidateObject => "INVALIDATE_OBJECT",
            PSNodeType::Free => "FREE",
        }
    }

    pub fn arity(&self) -> Arity {
        match self {
            PSNodeType::Phi => Arity::Merge,
            PSNodeType::NullAddr
            | PSNodeType::UnknownMem
            | PSNodeType::Noop
            | PSNodeType::Function
            | PSNodeType::Constant => Arity::Exactly(0),
            PSNodeType::Gep
            | PSNodeType::Load
            | PSNodeType::Cast
            | PSNodeType::InvalidateObject
            | PSNodeType::Free => Arity::Exactly(1),
            PSNodeType::Store | PSNodeType::Memcpy => Arity::Exactly(2),
            _ => Arity::Unchecked,
        }
    }

    /// May live outside the control flow (no predecessors, not reachable)
    pub fn can_float(&self) -> bool {
        matches!(
            self,
            PSNodeType::Function
                | PSNodeType::Constant
                | PSNodeType::UnknownMem
                | PSNodeType::NullAddr
        )
    }
}

impl fmt::Display for PSNodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One node of a points-to graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PSNode {
    id: PSNodeId,
    node_type: PSNodeType,
    /// Order-significant
    pub operands: Vec<PSNodeId>,
    pub(crate) successors: Vec<PSNodeId>,
    pub(crate) predecessors: Vec<PSNodeId>,
}

impl PSNode {
    pub(crate) fn new(id: PSNodeId, node_type: PSNodeType, operands: Vec<PSNodeId>) -> Self {
        Self {
            id,
            node_type,
            operands,
            successors: Vec::new(),
            predecessors: Vec::new(),
        }
    }

    #[inline]
    pub fn id(&self) -> PSNodeId {
        self.id
    }

    #[inline]
    pub fn node_type(&self) -> PSNodeType {
        self.node_type
    }

    pub fn successors(&self) -> &[PSNodeId] {
        &self.successors
    }

    pub fn predecessors(&self) -> &[PSNodeId] {
        &self.predecessors
    }

    pub fn has_duplicate_operand(&self) -> bool {
        let mut seen = FxHashSet::default();
        !self.operands.iter().all(|op| seen.insert(*op))
    }
}
