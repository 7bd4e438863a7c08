//! Tracking node attached to one engine state.

use serde::{Deserialize, Serialize};

use crate::event::LifecycleEvents;
use crate::ids::StateId;
use crate::info::StateInfo;

/// Payload of every node-level channel.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateSignal {
    pub state: StateId,
    pub info: StateInfo,
    pub layer: usize,
}

/// Whether the node has found its coordinator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Binding {
    /// No state-enter seen yet.
    #[default]
    Unbound,
    Bound,
    /// Lookup failed; the configuration error has already been reported.
    Missing,
}

/// Per-state tracking node. The engine owns its lifetime; the node keeps only
/// its last snapshot and its channels. Everything shared lives in the layer cursor.
#[derive(Debug)]
pub struct AnimatorState {
    pub(crate) id: StateId,
    pub name: String,
    pub(crate) info: Option<StateInfo>,
    pub(crate) binding: Binding,
    pub events: LifecycleEvents<StateSignal>,
}

impl AnimatorState {
    pub(crate) fn new(id: StateId, name: String, listener_capacity: usize) -> Self {
        Self {
            id,
            name,
            info: None,
            binding: Binding::Unbound,
            events: LifecycleEvents::with_capacity(listener_capacity),
        }
    }

    #[inline]
    pub fn id(&self) -> StateId {
        self.id
    }

    /// Snapshot captured by the most recent state-enter.
    #[inline]
    pub fn info(&self) -> Option<StateInfo> {
        self.info
    }

    #[inline]
    pub fn binding(&self) -> Binding {
        self.binding
    }

    /// Does `info` describe the engine state this node last entered?
    pub fn is_state(&self, info: &StateInfo) -> bool {
        self.info.as_ref() == Some(info)
    }
}
