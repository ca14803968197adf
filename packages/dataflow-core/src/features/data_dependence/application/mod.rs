pub mod analysis;

pub use analysis::DataDependenceAnalysis;
