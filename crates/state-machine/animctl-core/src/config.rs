//! Core configuration for animctl-core.

use serde::{Deserialize, Serialize};

use crate::error::{AnimatorError, Result};
use crate::layer::LogFlags;

/// Configuration for coordinator defaults and channel sizing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Debug-logging toggles copied onto every layer cursor the coordinator creates.
    /// Existing cursors keep their own flags across a rebuild.
    pub layer_logging: LogFlags,

    /// Initial capacity hint for listener maps.
    pub listener_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            layer_logging: LogFlags::none(),
            listener_capacity: 4,
        }
    }
}

impl Config {
    /// Parse a config from JSON. Missing fields fall back to [`Config::default`].
    pub fn from_json_str(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| AnimatorError::Config(e.to_string()))
    }
}
