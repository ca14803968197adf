pub mod definitions;
pub mod solver;

pub use definitions::{Definition, DefinitionSet};
pub use solver::{ReachingDefinitionsAnalysis, ReachingDefinitionsStats};
