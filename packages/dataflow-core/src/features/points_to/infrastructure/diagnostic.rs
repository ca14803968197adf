//! Validation diagnostics
//!
//! Each variant renders to the human-readable report lines:
//!
//! ```text
//! Invalid number of operands for PHI with ID 4
//!   - operands: [2 2]
//! (PHI Node contains duplicated operand)
//! Invalid number of edges for LOAD with ID 7
//! (Non-root node has no predecessors)
//! Unreachable LOAD with ID 7
//! Invalid operand 42 for LOAD with ID 3
//! (Operand is not a node of the graph)
//! Misplaced STORE with ID 9 at position 2
//! Invalid root with ID 5
//! (Root is not a node of the graph)
//! ```

use crate::errors::AnalysisError;
use crate::features::points_to::domain::{PSNode, PSNodeId, PSNodeType};
use std::fmt;

pub const CTX_DUPLICATE_OPERAND: &str = "PHI Node contains duplicated operand";
pub const CTX_MISSING_OPERAND: &str = "Operand is not a node of the graph";
pub const CTX_NO_PREDECESSORS: &str = "Non-root node has no predecessors";
pub const CTX_MISSING_PREDECESSOR: &str = "Node not set as a predecessor of some of its successors";
pub const CTX_MISSING_SUCCESSOR: &str = "Node not set as a successor of some of its predecessors";
pub const CTX_INVALID_ROOT: &str = "Root is not a node of the graph";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    InvalidOperands {
        node_type: PSNodeType,
        id: PSNodeId,
        operands: Vec<PSNodeId>,
        context: Option<String>,
    },
    InvalidEdges {
        node_type: PSNodeType,
        id: PSNodeId,
        context: String,
    },
    Unreachable {
        node_type: PSNodeType,
        id: PSNodeId,
    },
    /// Operand naming no node; the operand count itself may be fine
    MissingOperand {
        node_type: PSNodeType,
        id: PSNodeId,
        operand: PSNodeId,
    },
    /// Node whose id is not its position in the arena
    Misplaced {
        node_type: PSNodeType,
        id: PSNodeId,
        position: usize,
    },
    InvalidRoot {
        id: PSNodeId,
    },
}

impl Diagnostic {
    pub fn invalid_operands(node: &PSNode, context: Option<&str>) -> Self {
        Diagnostic::InvalidOperands {
            node_type: node.node_type(),
            id: node.id(),
            operands: node.operands.clone(),
            context: context.map(str::to_string),
        }
    }

    pub fn invalid_edges(node: &PSNode, context: &str) -> Self {
        Diagnostic::InvalidEdges {
            node_type: node.node_type(),
            id: node.id(),
            context: context.to_string(),
        }
    }

    pub fn unreachable(node: &PSNode) -> Self {
        Diagnostic::Unreachable {
            node_type: node.node_type(),
            id: node.id(),
        }
    }

    pub fn missing_operand(node: &PSNode, operand: PSNodeId) -> Self {
        Diagnostic::MissingOperand {
            node_type: node.node_type(),
            id: node.id(),
            operand,
        }
    }

    pub fn misplaced(node: &PSNode, position: usize) -> Self {
        Diagnostic::Misplaced {
            node_type: node.node_type(),
            id: node.id(),
            position,
        }
    }

    /// Offending node
    pub fn node(&self) -> PSNodeId {
        match self {
            Diagnostic::InvalidOperands { id, .. }
            | Diagnostic::InvalidEdges { id, .. }
            | Diagnostic::Unreachable { id, .. }
            | Diagnostic::MissingOperand { id, .. }
            | Diagnostic::Misplaced { id, .. }
            | Diagnostic::InvalidRoot { id } => *id,
        }
    }

    pub fn context(&self) -> Option<&str> {
        match self {
            Diagnostic::InvalidOperands { context, .. } => context.as_deref(),
            Diagnostic::InvalidEdges { context, .. } => Some(context),
            Diagnostic::MissingOperand { .. } => Some(CTX_MISSING_OPERAND),
            Diagnostic::InvalidRoot { .. } => Some(CTX_INVALID_ROOT),
            Diagnostic::Unreachable { .. } | Diagnostic::Misplaced { .. } => None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::InvalidOperands {
                node_type,
                id,
                operands,
                context,
            } => {
                writeln!(f, "Invalid number of operands for {} with ID {}", node_type, id)?;
                f.write_str("  - operands: [")?;
                for (i, op) in operands.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", op)?;
                }
                f.write_str("]\n")?;
                if let Some(ctx) = context {
                    writeln!(f, "({})", ctx)?;
                }
                Ok(())
            }
            Diagnostic::InvalidEdges {
                node_type,
                id,
                context,
            } => {
                writeln!(f, "Invalid number of edges for {} with ID {}", node_type, id)?;
                if !context.is_empty() {
                    writeln!(f, "({})", context)?;
                }
                Ok(())
            }
            Diagnostic::Unreachable { node_type, id } => {
                writeln!(f, "Unreachable {} with ID {}", node_type, id)
            }
            Diagnostic::MissingOperand {
                node_type,
                id,
                operand,
            } => {
                writeln!(f, "Invalid operand {} for {} with ID {}", operand, node_type, id)?;
                writeln!(f, "({})", CTX_MISSING_OPERAND)
            }
            Diagnostic::Misplaced {
                node_type,
                id,
                position,
            } => writeln!(f, "Misplaced {} with ID {} at position {}", node_type, id, position),
            Diagnostic::InvalidRoot { id } => {
                writeln!(f, "Invalid root with ID {}", id)?;
                writeln!(f, "({})", CTX_INVALID_ROOT)
            }
        }
    }
}

/// Everything one validation pass found
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub diagnostics: Vec<Diagnostic>,
}

impl ValidationReport {
    /// true if any violation was found
    #[inline]
    pub fn is_invalid(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    /// The accumulated report text
    pub fn errors(&self) -> String {
        self.to_string()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// `Err(InvalidPointerGraph)` if anything was found
    pub fn ensure_valid(&self) -> crate::errors::Result<()> {
        if self.is_invalid() {
            return Err(AnalysisError::InvalidPointerGraph {
                count: self.diagnostics.len(),
            });
        }
        Ok(())
    }

    pub(crate) fn extend(&mut self, other: ValidationReport) {
        self.diagnostics.extend(other.diagnostics);
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for diagnostic in &self.diagnostics {
            write!(f, "{}", diagnostic)?;
        }
        Ok(())
    }
}
