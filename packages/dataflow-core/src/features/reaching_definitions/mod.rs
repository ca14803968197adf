//! # Reaching Definitions
//!
//! Iterative fixpoint engine: per-node IN/OUT sets of reaching writes,
//! gen/kill transfer, union at joins.

pub mod infrastructure;

pub use infrastructure::{
    Definition, DefinitionSet, ReachingDefinitionsAnalysis, ReachingDefinitionsStats,
};
