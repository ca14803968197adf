//! YAML configuration files
//!
//! ```yaml
//! version: 1
//! preset: fast            # optional, defaults to balanced
//! data_dependence:        # optional overrides on top of the preset
//!   field_insensitive: true
//! validator:
//!   check_connectivity: false
//! ```

use super::error::{ConfigError, ConfigResult};
use super::options::{DataDependenceOptions, ValidatorOptions};
use super::preset::Preset;
use serde::{Deserialize, Serialize};
use std::path::Path;

const SUPPORTED_VERSIONS: &[u32] = &[1];

/// Overrides for `DataDependenceOptions`; unset fields keep the preset value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DataDependenceOverrides {
    pub use_ssa: Option<bool>,
    pub field_insensitive: Option<bool>,
    pub max_iterations: Option<usize>,
}

/// On-disk format, version 1
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFileV1 {
    pub version: Option<u32>,
    #[serde(default)]
    pub preset: Option<String>,
    #[serde(default)]
    pub data_dependence: Option<DataDependenceOverrides>,
    #[serde(default)]
    pub validator: Option<ValidatorOptions>,
}

/// Complete, validated configuration of the core
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisConfig {
    pub data_dependence: DataDependenceOptions,
    pub validator: ValidatorOptions,
}

impl AnalysisConfig {
    pub fn preset(preset: Preset) -> Self {
        Self {
            data_dependence: DataDependenceOptions::from_preset(preset),
            validator: ValidatorOptions::default(),
        }
    }

    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let file: ConfigFileV1 = serde_yaml::from_str(content)?;

        let version = file.version.ok_or(ConfigError::MissingVersion)?;
        if !SUPPORTED_VERSIONS.contains(&version) {
            return Err(ConfigError::UnsupportedVersion {
                found: version,
                supported: SUPPORTED_VERSIONS.to_vec(),
            });
        }

        let preset = match file.preset.as_deref() {
            Some(name) => {
                Preset::from_str(name).map_err(|_| ConfigError::UnknownPreset(name.to_string()))?
            }
            None => Preset::default(),
        };

        let mut config = Self::preset(preset);
        if let Some(overrides) = file.data_dependence {
            let dd = &mut config.data_dependence;
            if let Some(v) = overrides.use_ssa {
                dd.use_ssa = v;
            }
            if let Some(v) = overrides.field_insensitive {
                dd.field_insensitive = v;
            }
            if overrides.max_iterations.is_some() {
                dd.max_iterations = overrides.max_iterations;
            }
        }
        if let Some(validator) = file.validator {
            config.validator = validator;
        }

        config.data_dependence.validate()?;
        tracing::debug!(
            "Loaded analysis config: preset={}, use_ssa={}",
            preset.as_str(),
            config.data_dependence.use_ssa
        );
        Ok(config)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }
}
