//! Raw engine callbacks and the control handoff between tracking nodes.
//!
//! Expected order for a chain of blended states (time flows right):
//!
//! ```text
//! StateEnter(1)
//! ControlEnter(1)
//!     StateEnter(2)
//!     ControlExit(1)
//!         StateExit(1)
//!         ControlEnter(2)
//!             StateEnter(3)
//!             ControlExit(2)
//!                 StateExit(2)
//!                 ControlEnter(3)
//! ```
//!
//! Each of the six methods below owns the cursor fields it writes. Handoff is
//! re-entrant by construction: `state_enter` calls `control_exit` on another
//! node and `state_exit` calls `control_enter` on another node, all within
//! one call stack.

use indexmap::IndexMap;

use crate::addons::AddonSet;
use crate::error::{AnimatorError, Result};
use crate::event::LifecycleKind;
use crate::ids::StateId;
use crate::info::StateInfo;
use crate::layer::AnimatorLayer;
use crate::machine::{AnimatorStateMachine, LayerSignal};
use crate::state::{AnimatorState, Binding, StateSignal};

pub(crate) type StateArena = IndexMap<StateId, AnimatorState>;

/// Split borrow of an animator for the duration of one raw callback.
pub(crate) struct Lifecycle<'a> {
    pub(crate) states: &'a mut StateArena,
    pub(crate) machine: Option<&'a mut AnimatorStateMachine>,
    pub(crate) addons: &'a mut AddonSet,
}

impl<'a> Lifecycle<'a> {
    pub(crate) fn state_enter(&mut self, id: StateId, info: StateInfo, layer: usize) -> Result<()> {
        if let Some(machine) = self.machine.as_deref() {
            machine.check_layer(layer)?;
        }
        let resolved = self.resolve(id)?;
        if let Some(state) = self.states.get_mut(&id) {
            state.info = Some(info);
        }
        if !resolved {
            self.emit(LifecycleKind::StateEnter, id, info, layer);
            return Ok(());
        }

        self.layer_mut(layer)?.entering = Some(id);
        self.emit(LifecycleKind::StateEnter, id, info, layer);

        let (most_recent, current, is_started) = {
            let cursor = self.layer_mut(layer)?;
            (cursor.most_recent, cursor.current, cursor.is_started)
        };

        if let Some(recent) = most_recent {
            // Resuming after one or more untracked states. Close out the stale
            // holder and take control now; its state-exit already happened.
            log::trace!("layer {layer}: {id:?} resumes control from {recent:?}");
            let recent_info = self.stored_info(recent, info);
            self.control_exit(recent, recent_info, layer)?;
            self.control_enter(id, info, layer)?;
            let cursor = self.layer_mut(layer)?;
            cursor.most_recent = None;
            cursor.exiting = None;
        } else if let Some(current) = current {
            // Control passes to us once `current` reports its state-exit.
            log::trace!("layer {layer}: {current:?} hands off to {id:?}");
            let current_info = self.stored_info(current, info);
            self.control_exit(current, current_info, layer)?;
        } else if !is_started {
            log::trace!("layer {layer}: first control holder {id:?}");
            let cursor = self.layer_mut(layer)?;
            cursor.is_started = true;
            cursor.current = Some(id);
            self.control_enter(id, info, layer)?;
        } else {
            log::trace!("layer {layer}: {id:?} entered with nothing to hand off from");
        }
        Ok(())
    }

    pub(crate) fn state_update(&mut self, id: StateId, info: StateInfo, layer: usize) -> Result<()> {
        let resolved = self.check_known(id, layer)?;
        self.emit(LifecycleKind::StateUpdate, id, info, layer);
        if !resolved {
            return Ok(());
        }
        // Control polling only runs while this node is the sole authority.
        if self.layer_mut(layer)?.is_current_state(id) {
            self.control_update(id, info, layer)?;
        }
        Ok(())
    }

    pub(crate) fn state_exit(&mut self, id: StateId, info: StateInfo, layer: usize) -> Result<()> {
        let resolved = self.check_known(id, layer)?;
        self.emit(LifecycleKind::StateExit, id, info, layer);
        if !resolved {
            return Ok(());
        }

        let entering = {
            let cursor = self.layer_mut(layer)?;
            cursor.exiting = None;
            cursor.entering
        };

        if let Some(next) = entering {
            log::trace!("layer {layer}: {id:?} finished exiting, {next:?} takes control");
            let next_info = self.stored_info(next, info);
            self.control_enter(next, next_info, layer)?;
        } else {
            // No tracked successor: release control ourselves and leave a
            // marker for whichever tracked state enters next.
            log::trace!("layer {layer}: {id:?} exited into an untracked state");
            self.control_exit(id, info, layer)?;
            let cursor = self.layer_mut(layer)?;
            cursor.most_recent = Some(id);
            cursor.exiting = None;
        }
        Ok(())
    }

    fn control_enter(&mut self, id: StateId, info: StateInfo, layer: usize) -> Result<()> {
        if !self.is_resolved(id) {
            return Ok(());
        }
        let cursor = self.layer_mut(layer)?;
        cursor.entering = None;
        cursor.current = Some(id);
        self.emit(LifecycleKind::ControlEnter, id, info, layer);
        Ok(())
    }

    fn control_update(&mut self, id: StateId, info: StateInfo, layer: usize) -> Result<()> {
        if !self.is_resolved(id) {
            return Ok(());
        }
        self.emit(LifecycleKind::ControlUpdate, id, info, layer);
        Ok(())
    }

    fn control_exit(&mut self, id: StateId, info: StateInfo, layer: usize) -> Result<()> {
        if !self.is_resolved(id) {
            return Ok(());
        }
        let cursor = self.layer_mut(layer)?;
        cursor.current = None;
        cursor.exiting = Some(id);
        self.emit(LifecycleKind::ControlExit, id, info, layer);
        Ok(())
    }

    /// Bind `id` to the coordinator when one is attached. The first failed
    /// lookup is reported; later ones stay silent until a coordinator appears.
    fn resolve(&mut self, id: StateId) -> Result<bool> {
        let has_machine = self.machine.is_some();
        let state = self
            .states
            .get_mut(&id)
            .ok_or(AnimatorError::UnknownState(id))?;
        if has_machine {
            state.binding = Binding::Bound;
            return Ok(true);
        }
        if state.binding != Binding::Missing {
            log::error!(
                "state '{}' requires an AnimatorStateMachine for control context callbacks; \
                 control events will not be emitted until one is available",
                state.name
            );
            state.binding = Binding::Missing;
        }
        Ok(false)
    }

    /// Fails on unknown nodes, and on bad layer indices for resolved nodes.
    fn check_known(&self, id: StateId, layer: usize) -> Result<bool> {
        if !self.states.contains_key(&id) {
            return Err(AnimatorError::UnknownState(id));
        }
        let resolved = self.is_resolved(id);
        if resolved {
            if let Some(machine) = self.machine.as_deref() {
                machine.check_layer(layer)?;
            }
        }
        Ok(resolved)
    }

    fn is_resolved(&self, id: StateId) -> bool {
        self.machine.is_some()
            && self
                .states
                .get(&id)
                .is_some_and(|s| s.binding == Binding::Bound)
    }

    fn layer_mut(&mut self, index: usize) -> Result<&mut AnimatorLayer> {
        self.machine
            .as_deref_mut()
            .ok_or(AnimatorError::MissingStateMachine)?
            .layer_mut(index)
    }

    fn stored_info(&self, id: StateId, fallback: StateInfo) -> StateInfo {
        self.states
            .get(&id)
            .and_then(|s| s.info)
            .unwrap_or(fallback)
    }

    /// Node channel, then layer channel, then layer debug log, then addons.
    fn emit(&mut self, kind: LifecycleKind, id: StateId, info: StateInfo, layer: usize) {
        let Some(state) = self.states.get_mut(&id) else {
            return;
        };
        state
            .events
            .channel_mut(kind)
            .emit(&StateSignal { state: id, info, layer });
        if state.binding != Binding::Bound {
            return;
        }
        let Some(machine) = self.machine.as_deref_mut() else {
            return;
        };
        machine.forward(kind, LayerSignal { layer, state: id });

        let (Ok(cursor), Some(state)) = (machine.layer(layer), self.states.get(&id)) else {
            return;
        };
        if cursor.logging.enabled(kind) {
            log::info!("<{}> {}: {}", cursor.name, kind.label(), state.name);
        }
        self.addons.dispatch(kind, cursor, state);
    }
}
