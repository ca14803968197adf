/*
 * Data Dependence Error Types
 *
 * Usage errors of the engines and the facade:
 * - querying before run() / running twice
 * - node ids that do not belong to the graph
 * - fixpoint iteration budget exhausted
 * - options out of range
 */

use crate::features::read_write_graph::NodeId;
use std::fmt;

/// Data dependence error type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataDependenceError {
    /// Query issued before `run()` completed
    NotRun,

    /// `run()` called on an engine that already ran
    AlreadyRun,

    /// Node id outside the graph
    UnknownNode { id: NodeId },

    /// Fixpoint did not converge within the configured budget
    IterationLimitExceeded { limit: usize },

    /// Graph cannot be analyzed (e.g. no root)
    InvalidGraph { reason: String },

    /// Options rejected by `DataDependenceOptions::validate`
    InvalidOptions { reason: String },
}

impl fmt::Display for DataDependenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataDependenceError::NotRun => {
                write!(f, "Analysis has not been run yet")
            }
            DataDependenceError::AlreadyRun => {
                write!(f, "Analysis has already been run")
            }
            DataDependenceError::UnknownNode { id } => {
                write!(f, "Node {} is not part of the graph", id)
            }
            DataDependenceError::IterationLimitExceeded { limit } => {
                write!(f, "Fixpoint not reached within {} iterations", limit)
            }
            DataDependenceError::InvalidGraph { reason } => {
                write!(f, "Invalid read-write graph: {}", reason)
            }
            DataDependenceError::InvalidOptions { reason } => {
                write!(f, "Invalid data dependence options: {}", reason)
            }
        }
    }
}

impl std::error::Error for DataDependenceError {}

/// Result type for data dependence operations
pub type DataDependenceResult<T> = Result<T, DataDependenceError>;
