//! Diff settings, optionally loaded from a TOML file.
//!
//! ```toml
//! max_move_passes = 256
//!
//! [character]
//! similarity_threshold = 1
//!
//! [line]
//! similarity_threshold = 0
//!
//! [lexical]
//! similarity_threshold = 0
//! ```
//!
//! Missing keys keep their defaults.

use crate::diff::DEFAULT_MAX_MOVE_PASSES;
use crate::error::ConfigError;
use crate::model::Weight;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Settings for one family of diff tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolSettings {
    /// Runs must weigh strictly more than this to be reported
    pub similarity_threshold: Weight,
}

impl ToolSettings {
    pub fn with_threshold(similarity_threshold: Weight) -> Self {
        Self {
            similarity_threshold,
        }
    }
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self::with_threshold(0)
    }
}

/// Settings handed to every diff tool factory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffSettings {
    pub max_move_passes: usize,
    pub character: ToolSettings,
    pub line: ToolSettings,
    pub lexical: ToolSettings,
}

impl Default for DiffSettings {
    fn default() -> Self {
        Self {
            max_move_passes: DEFAULT_MAX_MOVE_PASSES,
            character: ToolSettings::with_threshold(1),
            line: ToolSettings::with_threshold(0),
            lexical: ToolSettings::with_threshold(0),
        }
    }
}

impl DiffSettings {
    /// Loads settings from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid TOML, or
    /// holds invalid values.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| ConfigError::read_error(path.display().to_string(), e))?;
        Self::from_toml(&text).map_err(|e| match e {
            ConfigError::TomlError { source, .. } => {
                ConfigError::toml_error(path.display().to_string(), source)
            }
            other => other,
        })
    }

    /// Parses and validates settings from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let settings: DiffSettings =
            toml::from_str(text).map_err(|e| ConfigError::toml_error("<inline>", e))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_move_passes == 0 {
            return Err(ConfigError::invalid("max_move_passes must be at least 1"));
        }
        Ok(())
    }
}
