//! # Data Dependence
//!
//! Facade over the two reaching-definitions engines:
//! - fixpoint reaching definitions (`features::reaching_definitions`)
//! - Memory-SSA reconstruction (`features::memory_ssa`)
//!
//! ```text
//! let options = DataDependenceOptions::default().use_ssa(true);
//! let mut dda = DataDependenceAnalysis::new(graph, options);
//! dda.run()?;
//! let defs = dda.get_definitions_for_use(load)?;
//! ```

pub mod application;
pub mod infrastructure;
pub mod ports;

pub use application::DataDependenceAnalysis;
pub use infrastructure::{DataDependenceError, DataDependenceResult};
pub use ports::DataDependenceEngine;
