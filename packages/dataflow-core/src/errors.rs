//! Error types for dataflow-core
//!
//! Feature errors convert into `AnalysisError` with `?`.

use crate::config::ConfigError;
use crate::features::data_dependence::DataDependenceError;
use thiserror::Error;

/// Main error type for dataflow-core operations
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Engine usage or graph error
    #[error("Data dependence error: {0}")]
    DataDependence(#[from] DataDependenceError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Points-to graph failed validation
    #[error("Invalid points-to graph ({count} violations)")]
    InvalidPointerGraph { count: usize },
}

/// Result type alias for dataflow-core operations
pub type Result<T> = std::result::Result<T, AnalysisError>;
