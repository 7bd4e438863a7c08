//! Per-layer control cursor.

use serde::{Deserialize, Serialize};

use crate::event::LifecycleKind;
use crate::ids::StateId;

/// Debug-logging toggles, one per lifecycle channel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogFlags {
    pub control_enters: bool,
    pub state_enters: bool,
    pub control_exits: bool,
    pub state_exits: bool,
    pub control_updates: bool,
    pub state_updates: bool,
}

impl LogFlags {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn all() -> Self {
        Self {
            control_enters: true,
            state_enters: true,
            control_exits: true,
            state_exits: true,
            control_updates: true,
            state_updates: true,
        }
    }

    #[inline]
    pub fn enabled(&self, kind: LifecycleKind) -> bool {
        match kind {
            LifecycleKind::StateEnter => self.state_enters,
            LifecycleKind::StateUpdate => self.state_updates,
            LifecycleKind::StateExit => self.state_exits,
            LifecycleKind::ControlEnter => self.control_enters,
            LifecycleKind::ControlUpdate => self.control_updates,
            LifecycleKind::ControlExit => self.control_exits,
        }
    }
}

/// Shared cursor for one engine layer.
///
/// Tracking nodes never talk to each other directly; every handoff reads and
/// writes these fields. `current` names the only node in control. `entering`
/// and `exiting` are transient while a blend is in flight. `most_recent`
/// remembers a node that exited with no tracked successor.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimatorLayer {
    pub name: String,
    pub current: Option<StateId>,
    pub entering: Option<StateId>,
    pub exiting: Option<StateId>,
    pub most_recent: Option<StateId>,
    pub is_started: bool,
    #[serde(default)]
    pub logging: LogFlags,
}

impl AnimatorLayer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_logging(mut self, logging: LogFlags) -> Self {
        self.logging = logging;
        self
    }

    #[inline]
    pub fn is_current_state(&self, state: StateId) -> bool {
        self.current == Some(state)
    }

    #[inline]
    pub fn is_entering_state(&self, state: StateId) -> bool {
        self.entering == Some(state)
    }

    #[inline]
    pub fn is_exiting_state(&self, state: StateId) -> bool {
        self.exiting == Some(state)
    }

    /// True while a blend is in flight (a node waits for control or still finishes its exit).
    #[inline]
    pub fn is_transitioning(&self) -> bool {
        self.entering.is_some() || self.exiting.is_some()
    }
}
