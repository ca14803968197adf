//! Memory SSA feature
//!
//! Demand-driven SSA over memory objects. Answers the same queries as
//! `reaching_definitions`, usually with smaller results.

pub mod infrastructure;

pub use infrastructure::{MemoryDef, MemoryPhi, MemorySSAStats, MemorySSATransformation, PhiId};
