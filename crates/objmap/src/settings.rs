// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Mapper settings.
//!
//! Supports both programmatic and file-based (TOML) configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Default nesting limit for plan compilation.
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Upper bound accepted for `default_max_depth`.
pub const MAX_DEPTH_LIMIT: usize = 1024;

/// Settings errors.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid settings: {0}")]
    Invalid(String),
}

/// Mapper settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapperSettings {
    /// Nesting levels expanded when a pair has no `set_depth`.
    #[serde(default = "default_max_depth")]
    pub default_max_depth: usize,

    /// Keep compiled plans between calls.
    #[serde(default = "default_true")]
    pub cache_plans: bool,
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

fn default_true() -> bool {
    true
}

impl Default for MapperSettings {
    fn default() -> Self {
        Self {
            default_max_depth: DEFAULT_MAX_DEPTH,
            cache_plans: true,
        }
    }
}

impl MapperSettings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse settings from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
        let settings: Self = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate the settings.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.default_max_depth > MAX_DEPTH_LIMIT {
            return Err(SettingsError::Invalid(format!(
                "default_max_depth {} exceeds {}",
                self.default_max_depth, MAX_DEPTH_LIMIT
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = MapperSettings::default();
        assert_eq!(settings.default_max_depth, 10);
        assert!(settings.cache_plans);
    }

    #[test]
    fn test_parse_partial() {
        let settings = MapperSettings::from_toml_str("default_max_depth = 3").expect("parse");
        assert_eq!(settings.default_max_depth, 3);
        assert!(settings.cache_plans);

        let empty = MapperSettings::from_toml_str("").expect("empty");
        assert_eq!(empty, MapperSettings::default());
    }

    #[test]
    fn test_invalid_depth() {
        let err = MapperSettings::from_toml_str("default_max_depth = 5000").expect_err("too deep");
        assert!(matches!(err, SettingsError::Invalid(_)));
    }

    #[test]
    fn test_bad_toml() {
        let err = MapperSettings::from_toml_str("default_max_depth = \"ten\"").expect_err("type");
        assert!(matches!(err, SettingsError::Toml(_)));
    }
}
