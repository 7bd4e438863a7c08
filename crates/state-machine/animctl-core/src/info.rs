//! State-info snapshots handed to every raw callback.

use serde::{Deserialize, Serialize};

/// Snapshot of an engine state at the moment of a callback.
///
/// Only `full_path_hash` takes part in equality: two snapshots describe the
/// same state when their logical paths hash the same, regardless of timing.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct StateInfo {
    pub full_path_hash: i32,
    #[serde(default)]
    pub short_name_hash: i32,
    #[serde(default)]
    pub normalized_time: f32,
    #[serde(default)]
    pub length: f32,
    #[serde(default = "default_speed")]
    pub speed: f32,
}

fn default_speed() -> f32 {
    1.0
}

impl StateInfo {
    pub fn new(full_path_hash: i32) -> Self {
        Self {
            full_path_hash,
            short_name_hash: full_path_hash,
            normalized_time: 0.0,
            length: 0.0,
            speed: 1.0,
        }
    }

    pub fn with_short_name_hash(mut self, hash: i32) -> Self {
        self.short_name_hash = hash;
        self
    }

    pub fn with_normalized_time(mut self, t: f32) -> Self {
        self.normalized_time = t;
        self
    }

    pub fn with_length(mut self, seconds: f32) -> Self {
        self.length = seconds;
        self
    }
}

impl PartialEq for StateInfo {
    fn eq(&self, other: &Self) -> bool {
        self.full_path_hash == other.full_path_hash
    }
}

impl Eq for StateInfo {}
