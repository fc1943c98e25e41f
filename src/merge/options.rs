//! Merge configuration.

use serde::{Deserialize, Serialize};

/// Errors from loading merge options.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// How `extend` copies entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeOptions {
    /// Recurse into mappings and sequences instead of copying them by
    /// reference (default: false).
    pub deep: bool,
}

impl MergeOptions {
    pub fn deep() -> Self {
        Self { deep: true }
    }

    pub fn shallow() -> Self {
        Self { deep: false }
    }

    /// Load options from TOML text. Missing keys keep their defaults.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }
}
