//! Configuration for mqconn-core
//!
//! Controls which client library level the encoder targets and how
//! optional features that level cannot express are reported.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::capability::{Capabilities, BASELINE_LEVEL, MAX_LEVEL};
use crate::error::{CnoError, Result};
use crate::ffi::MqLong;

/// What to do with an optional feature the library cannot express
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DroppedFeaturePolicy {
    /// Drop it without a log line above `trace`
    #[default]
    Silent,
    /// Drop it and emit a `warn` event
    Warn,
}

/// Marshaling configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarshalConfig {
    /// Highest `MQCNO` version of the linked client library.
    /// `None` uses the level detected from the build.
    pub library_level: Option<MqLong>,

    /// Handling of features above `library_level`
    pub dropped_features: DroppedFeaturePolicy,
}

impl MarshalConfig {
    /// Target a specific client library level
    pub fn for_library_level(level: MqLong) -> Self {
        Self {
            library_level: Some(level),
            ..Self::default()
        }
    }

    /// Warn whenever a requested feature is dropped
    pub fn warn_on_drop() -> Self {
        Self {
            dropped_features: DroppedFeaturePolicy::Warn,
            ..Self::default()
        }
    }

    /// Capability table this configuration resolves to
    pub fn capabilities(&self) -> Capabilities {
        match self.library_level {
            Some(level) => Capabilities::for_level(level),
            None => Capabilities::global(),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if let Some(level) = self.library_level {
            if !(BASELINE_LEVEL..=MAX_LEVEL).contains(&level) {
                return Err(CnoError::InvalidConfig(format!(
                    "library_level must be between {} and {}, got {}",
                    BASELINE_LEVEL, MAX_LEVEL, level
                )));
            }
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}
