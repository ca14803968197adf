//! Preset configurations

use serde::{Deserialize, Serialize};

/// Configuration preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Memory-SSA engine, on-demand phi placement
    Fast,

    /// Fixpoint reaching definitions (the default)
    Balanced,
}

impl Preset {
    /// Parse preset from string
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "fast" => Ok(Self::Fast),
            "balanced" => Ok(Self::Balanced),
            _ => Err(format!("Unknown preset: {}", s)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fast => "fast",
            Self::Balanced => "balanced",
        }
    }
}

impl Default for Preset {
    fn default() -> Self {
        Self::Balanced
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_from_str() {
        assert_eq!(Preset::from_str("FAST"), Ok(Preset::Fast));
        assert_eq!(Preset::from_str("balanced"), Ok(Preset::Balanced));
        assert!(Preset::from_str("thorough").is_err());
    }
}
