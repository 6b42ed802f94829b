//! Editor tunables.

use crate::history::MAX_UNDO_HISTORY;
use crate::simplify::DEFAULT_TOLERANCE;
use crate::snap::SNAP_THRESHOLD;
use crate::timing::{DEFAULT_DEBOUNCE, DEFAULT_THROTTLE};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Errors from loading or validating an [`EditorConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Tunable constants for an editor session. Missing fields take their
/// default when deserializing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Minimum distance between kept stroke points.
    pub simplify_tolerance: f64,
    /// Throttle window for pointer moves, in milliseconds.
    pub throttle_ms: u64,
    /// Debounce delay for commits, in milliseconds.
    pub debounce_ms: u64,
    /// Maximum snap distance.
    pub snap_threshold: f64,
    /// Number of undoable batches kept.
    pub max_history: usize,
    pub snapping_enabled: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            simplify_tolerance: DEFAULT_TOLERANCE,
            throttle_ms: DEFAULT_THROTTLE.as_millis() as u64,
            debounce_ms: DEFAULT_DEBOUNCE.as_millis() as u64,
            snap_threshold: SNAP_THRESHOLD,
            max_history: MAX_UNDO_HISTORY,
            snapping_enabled: true,
        }
    }
}

impl EditorConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded editor config from {}", path.display());
        Ok(config)
    }

    /// Check ranges. A tolerance at or below zero is accepted and keeps
    /// every stroke point.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.simplify_tolerance.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "simplify_tolerance must be a finite number, got {}",
                self.simplify_tolerance
            )));
        }
        if !self.snap_threshold.is_finite() || self.snap_threshold < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "snap_threshold must be a non-negative number, got {}",
                self.snap_threshold
            )));
        }
        if self.max_history == 0 {
            return Err(ConfigError::Invalid("max_history must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Throttle window as a [`Duration`].
    pub fn throttle(&self) -> Duration {
        Duration::from_millis(self.throttle_ms)
    }

    /// Debounce delay as a [`Duration`].
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.simplify_tolerance, 2.5);
        assert_eq!(config.throttle(), Duration::from_millis(16));
        assert_eq!(config.debounce(), Duration::from_millis(300));
        assert_eq!(config.snap_threshold, 5.0);
        assert_eq!(config.max_history, 50);
        assert!(config.snapping_enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = EditorConfig::from_json(r#"{ "snap_threshold": 8.0 }"#).expect("valid config");
        assert_eq!(config.snap_threshold, 8.0);
        assert_eq!(config.max_history, 50);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = EditorConfig {
            throttle_ms: 32,
            snapping_enabled: false,
            ..EditorConfig::default()
        };
        let json = config.to_json().expect("serialize");
        assert_eq!(EditorConfig::from_json(&json).expect("parse"), config);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let err = EditorConfig::from_json(r#"{ "max_history": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let config = EditorConfig {
            simplify_tolerance: f64::INFINITY,
            ..EditorConfig::default()
        };
        assert!(config.validate().is_err());

        let config = EditorConfig {
            snap_threshold: -1.0,
            ..EditorConfig::default()
        };
        assert!(config.validate().is_err());

        let config = EditorConfig {
            snap_threshold: f64::NAN,
            ..EditorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_positive_tolerance_is_valid() {
        let config =
            EditorConfig::from_json(r#"{ "simplify_tolerance": -1.0 }"#).expect("valid config");
        assert_eq!(config.simplify_tolerance, -1.0);
    }

    #[test]
    fn test_malformed_json() {
        let err = EditorConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{ "debounce_ms": 120 }}"#).expect("write config");

        let config = EditorConfig::load(file.path()).expect("load config");
        assert_eq!(config.debounce(), Duration::from_millis(120));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = EditorConfig::load(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
