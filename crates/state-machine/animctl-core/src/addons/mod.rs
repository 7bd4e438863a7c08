//! Per-node listeners for cross-cutting behaviour.
//!
//! An addon is attached to one tracking node. It stays dormant until the
//! coordinator is ready, then receives that node's lifecycle calls together
//! with the layer cursor they happened on.

mod audio;
mod debug_logger;

pub use audio::{AudioControllerCfg, AudioSnapshot, AudioSnapshotController};
pub use debug_logger::DebugLogger;

use std::fmt;

use crate::event::LifecycleKind;
use crate::ids::{AddonId, StateId};
use crate::layer::AnimatorLayer;
use crate::state::AnimatorState;

/// Lifecycle listener contract. Every hook defaults to a no-op.
pub trait StateAddon {
    /// Called once, when the addon becomes active.
    fn on_ready(&mut self) {}
    fn on_state_enter(&mut self, _layer: &AnimatorLayer, _state: &AnimatorState) {}
    fn on_state_update(&mut self, _layer: &AnimatorLayer, _state: &AnimatorState) {}
    fn on_state_exit(&mut self, _layer: &AnimatorLayer, _state: &AnimatorState) {}
    fn on_control_enter(&mut self, _layer: &AnimatorLayer, _state: &AnimatorState) {}
    fn on_control_update(&mut self, _layer: &AnimatorLayer, _state: &AnimatorState) {}
    fn on_control_exit(&mut self, _layer: &AnimatorLayer, _state: &AnimatorState) {}
}

fn dispatch_one(
    addon: &mut dyn StateAddon,
    kind: LifecycleKind,
    layer: &AnimatorLayer,
    state: &AnimatorState,
) {
    match kind {
        LifecycleKind::StateEnter => addon.on_state_enter(layer, state),
        LifecycleKind::StateUpdate => addon.on_state_update(layer, state),
        LifecycleKind::StateExit => addon.on_state_exit(layer, state),
        LifecycleKind::ControlEnter => addon.on_control_enter(layer, state),
        LifecycleKind::ControlUpdate => addon.on_control_update(layer, state),
        LifecycleKind::ControlExit => addon.on_control_exit(layer, state),
    }
}

struct AddonSlot {
    id: AddonId,
    state: StateId,
    active: bool,
    addon: Box<dyn StateAddon>,
}

/// Addons in attachment order.
#[derive(Default)]
pub(crate) struct AddonSet {
    slots: Vec<AddonSlot>,
}

impl fmt::Debug for AddonSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.slots.iter().map(|s| (s.id, s.state, s.active)))
            .finish()
    }
}

impl AddonSet {
    /// Attach; activates immediately when the coordinator is already ready.
    pub(crate) fn insert(
        &mut self,
        id: AddonId,
        state: StateId,
        addon: Box<dyn StateAddon>,
        ready: bool,
    ) {
        let mut slot = AddonSlot {
            id,
            state,
            active: false,
            addon,
        };
        if ready {
            slot.active = true;
            slot.addon.on_ready();
        }
        self.slots.push(slot);
    }

    pub(crate) fn remove(&mut self, id: AddonId) -> Option<Box<dyn StateAddon>> {
        let pos = self.slots.iter().position(|s| s.id == id)?;
        Some(self.slots.remove(pos).addon)
    }

    pub(crate) fn remove_for_state(&mut self, state: StateId) {
        self.slots.retain(|s| s.state != state);
    }

    pub(crate) fn activate_pending(&mut self) {
        for slot in self.slots.iter_mut().filter(|s| !s.active) {
            slot.active = true;
            slot.addon.on_ready();
        }
    }

    pub(crate) fn dispatch(
        &mut self,
        kind: LifecycleKind,
        layer: &AnimatorLayer,
        state: &AnimatorState,
    ) {
        for slot in self
            .slots
            .iter_mut()
            .filter(|s| s.active && s.state == state.id())
        {
            dispatch_one(slot.addon.as_mut(), kind, layer, state);
        }
    }

    pub(crate) fn is_active(&self, id: AddonId) -> Option<bool> {
        self.slots.iter().find(|s| s.id == id).map(|s| s.active)
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }
}
