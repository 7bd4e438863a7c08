use std::fmt;

use serde::{Deserialize, Serialize};

use crate::layer::AnimatorLayer;
use crate::state::AnimatorState;

use super::StateAddon;

/// A mixer snapshot the host can blend to.
pub trait AudioSnapshot {
    fn transition_to(&mut self, seconds: f32);
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioControllerCfg {
    /// Blend time into the "during control" snapshot.
    pub enter_seconds: f32,
    /// Blend time into the "after control" snapshot.
    pub exit_seconds: f32,
}

impl Default for AudioControllerCfg {
    fn default() -> Self {
        Self {
            enter_seconds: 1.0,
            exit_seconds: 1.0,
        }
    }
}

/// Switches mixer snapshots as its node gains and loses control.
#[derive(Default)]
pub struct AudioSnapshotController {
    pub cfg: AudioControllerCfg,
    during_control: Option<Box<dyn AudioSnapshot>>,
    after_control: Option<Box<dyn AudioSnapshot>>,
}

impl fmt::Debug for AudioSnapshotController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioSnapshotController")
            .field("cfg", &self.cfg)
            .field("during_control", &self.during_control.is_some())
            .field("after_control", &self.after_control.is_some())
            .finish()
    }
}

impl AudioSnapshotController {
    pub fn new(cfg: AudioControllerCfg) -> Self {
        Self {
            cfg,
            during_control: None,
            after_control: None,
        }
    }

    pub fn with_during_control(mut self, snapshot: impl AudioSnapshot + 'static) -> Self {
        self.during_control = Some(Box::new(snapshot));
        self
    }

    pub fn with_after_control(mut self, snapshot: impl AudioSnapshot + 'static) -> Self {
        self.after_control = Some(Box::new(snapshot));
        self
    }
}

impl StateAddon for AudioSnapshotController {
    fn on_control_enter(&mut self, _layer: &AnimatorLayer, _state: &AnimatorState) {
        if let Some(snapshot) = self.during_control.as_mut() {
            snapshot.transition_to(self.cfg.enter_seconds);
        }
    }

    fn on_control_exit(&mut self, _layer: &AnimatorLayer, _state: &AnimatorState) {
        if let Some(snapshot) = self.after_control.as_mut() {
            snapshot.transition_to(self.cfg.exit_seconds);
        }
    }
}
