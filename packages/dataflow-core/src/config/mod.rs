//! Configuration
//!
//! - Preset: one-liner defaults (`Preset::Fast`, `Preset::Balanced`)
//! - Builder: `DataDependenceOptions::default().use_ssa(true)`
//! - YAML: `AnalysisConfig::from_yaml_file("analysis.yaml")`

pub mod error;
pub mod io;
pub mod options;
pub mod preset;

pub use error::{ConfigError, ConfigResult};
pub use io::{AnalysisConfig, ConfigFileV1, DataDependenceOverrides};
pub use options::{DataDependenceOptions, ValidatorOptions};
pub use preset::Preset;
