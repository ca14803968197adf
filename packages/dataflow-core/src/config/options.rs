//! Analysis options
//!
//! Immutable once handed to an analysis: the facade and the engines only
//! ever read them.

use super::error::{ConfigError, ConfigResult};
use super::preset::Preset;
use serde::{Deserialize, Serialize};

const MAX_ITERATIONS_LIMIT: usize = 100_000_000;

/// Data-dependence analysis options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DataDependenceOptions {
    /// Use the Memory-SSA engine instead of fixpoint reaching definitions
    pub use_ssa: bool,

    /// Ignore offsets: every access covers its whole object.
    ///
    /// No write can kill another in this mode.
    pub field_insensitive: bool,

    /// Max worklist pops for the fixpoint engine (None=unlimited).
    ///
    /// Running out is an error, the partial result is never returned.
    pub max_iterations: Option<usize>,
}

impl DataDependenceOptions {
    pub fn from_preset(preset: Preset) -> Self {
        match preset {
            Preset::Fast => Self {
                use_ssa: true,
                field_insensitive: false,
                max_iterations: None,
            },
            Preset::Balanced => Self {
                use_ssa: false,
                field_insensitive: false,
                max_iterations: None,
            },
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(n) = self.max_iterations {
            if n == 0 || n > MAX_ITERATIONS_LIMIT {
                return Err(ConfigError::range_with_hint(
                    "max_iterations",
                    n,
                    1,
                    MAX_ITERATIONS_LIMIT,
                    "Use None for an unbounded fixpoint",
                ));
            }
        }
        Ok(())
    }

    #[inline]
    pub fn is_ssa(&self) -> bool {
        self.use_ssa
    }

    /// Builder: Set use_ssa
    pub fn use_ssa(mut self, v: bool) -> Self {
        self.use_ssa = v;
        self
    }

    /// Builder: Set field_insensitive
    pub fn field_insensitive(mut self, v: bool) -> Self {
        self.field_insensitive = v;
        self
    }

    /// Builder: Set max_iterations
    pub fn max_iterations(mut self, v: Option<usize>) -> Self {
        self.max_iterations = v;
        self
    }
}

impl Default for DataDependenceOptions {
    fn default() -> Self {
        Self::from_preset(Preset::Balanced)
    }
}

/// Points-to graph validator options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidatorOptions {
    /// Report nodes not reachable from the root
    pub check_connectivity: bool,
}

impl ValidatorOptions {
    /// Builder: Set check_connectivity
    pub fn check_connectivity(mut self, v: bool) -> Self {
        self.check_connectivity = v;
        self
    }
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self {
            check_connectivity: true,
        }
    }
}
