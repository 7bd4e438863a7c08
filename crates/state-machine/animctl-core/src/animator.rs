//! Animator: the per-entity handle the engine drives.
//!
//! Methods:
//! - add_layer, add_state, remove_state (the engine owns node lifetime)
//! - add_state_machine, enable/disable/remove_state_machine, validate
//! - state_enter, state_update, state_exit (raw callbacks)
//! - add_addon, remove_addon

use crate::addons::{AddonSet, StateAddon};
use crate::config::Config;
use crate::error::{AnimatorError, Result};
use crate::ids::{AddonId, IdAllocator, StateId};
use crate::info::StateInfo;
use crate::lifecycle::{Lifecycle, StateArena};
use crate::machine::{AnimatorHandle, AnimatorStateMachine};
use crate::state::AnimatorState;

/// Read-only view handed to the coordinator while it is borrowed mutably.
struct EngineView<'a> {
    layers: &'a [String],
    states: &'a StateArena,
}

impl AnimatorHandle for EngineView<'_> {
    fn layer_count(&self) -> usize {
        self.layers.len()
    }

    fn layer_name(&self, index: usize) -> Option<&str> {
        self.layers.get(index).map(String::as_str)
    }

    fn behaviours(&self) -> Vec<StateId> {
        self.states.keys().copied().collect()
    }
}

#[derive(Debug)]
pub struct Animator {
    cfg: Config,
    ids: IdAllocator,
    layers: Vec<String>,
    states: StateArena,
    machine: Option<AnimatorStateMachine>,
    addons: AddonSet,
}

impl Default for Animator {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Animator {
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            ids: IdAllocator::new(),
            layers: Vec::new(),
            states: StateArena::default(),
            machine: None,
            addons: AddonSet::default(),
        }
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Append an engine layer and return its index.
    /// An enabled coordinator picks it up on the next `validate`.
    pub fn add_layer(&mut self, name: &str) -> usize {
        self.layers.push(name.to_string());
        self.layers.len() - 1
    }

    pub fn rename_layer(&mut self, index: usize, name: &str) -> Result<()> {
        let count = self.layers.len();
        let slot = self
            .layers
            .get_mut(index)
            .ok_or(AnimatorError::LayerOutOfRange { index, count })?;
        *slot = name.to_string();
        Ok(())
    }

    #[inline]
    pub fn layer_names(&self) -> &[String] {
        &self.layers
    }

    /// Attach a tracking node. A coordinator that is already enabled only sees it
    /// after the next `enable_state_machine`.
    pub fn add_state(&mut self, name: &str) -> StateId {
        let id = self.ids.alloc_state();
        self.states.insert(
            id,
            AnimatorState::new(id, name.to_string(), self.cfg.listener_capacity),
        );
        id
    }

    /// Detach a tracking node and its addons. Layer cursors that still name it are left as-is.
    pub fn remove_state(&mut self, id: StateId) -> Result<AnimatorState> {
        let state = self
            .states
            .shift_remove(&id)
            .ok_or(AnimatorError::UnknownState(id))?;
        self.addons.remove_for_state(id);
        Ok(state)
    }

    pub fn state(&self, id: StateId) -> Option<&AnimatorState> {
        self.states.get(&id)
    }

    pub fn state_mut(&mut self, id: StateId) -> Option<&mut AnimatorState> {
        self.states.get_mut(&id)
    }

    pub fn state_by_name(&self, name: &str) -> Option<&AnimatorState> {
        self.states.values().find(|s| s.name == name)
    }

    pub fn states(&self) -> impl Iterator<Item = &AnimatorState> {
        self.states.values()
    }

    /// Attach a coordinator if none is present, then enable it.
    pub fn add_state_machine(&mut self) -> &mut AnimatorStateMachine {
        let cfg = self.cfg.clone();
        let Self {
            layers,
            states,
            machine,
            addons,
            ..
        } = self;
        let machine = machine.get_or_insert_with(|| AnimatorStateMachine::new(cfg));
        machine.enable(&EngineView {
            layers: layers.as_slice(),
            states: &*states,
        });
        addons.activate_pending();
        machine
    }

    /// Re-discover tracking nodes. Previous registrations are dropped first.
    pub fn enable_state_machine(&mut self) -> Result<()> {
        let machine = self
            .machine
            .as_mut()
            .ok_or(AnimatorError::MissingStateMachine)?;
        machine.enable(&EngineView {
            layers: &self.layers,
            states: &self.states,
        });
        if machine.is_ready() {
            self.addons.activate_pending();
        }
        Ok(())
    }

    pub fn disable_state_machine(&mut self) -> Result<()> {
        self.machine
            .as_mut()
            .ok_or(AnimatorError::MissingStateMachine)?
            .disable();
        Ok(())
    }

    pub fn remove_state_machine(&mut self) -> Option<AnimatorStateMachine> {
        let mut machine = self.machine.take()?;
        machine.disable();
        Some(machine)
    }

    /// Refresh cursor names (and add cursors for new layers) without touching live state.
    pub fn validate(&mut self) {
        if let Some(machine) = self.machine.as_mut() {
            machine.validate(&EngineView {
                layers: &self.layers,
                states: &self.states,
            });
        }
    }

    #[inline]
    pub fn state_machine(&self) -> Option<&AnimatorStateMachine> {
        self.machine.as_ref()
    }

    #[inline]
    pub fn state_machine_mut(&mut self) -> Option<&mut AnimatorStateMachine> {
        self.machine.as_mut()
    }

    /// Failures are logged at error level as well as returned.
    pub fn state_enter(&mut self, state: StateId, info: StateInfo, layer: usize) -> Result<()> {
        let result = self.lifecycle().state_enter(state, info, layer);
        result.inspect_err(|e| self.report("OnStateEnter", state, layer, e))
    }

    pub fn state_update(&mut self, state: StateId, info: StateInfo, layer: usize) -> Result<()> {
        let result = self.lifecycle().state_update(state, info, layer);
        result.inspect_err(|e| self.report("OnStateUpdate", state, layer, e))
    }

    pub fn state_exit(&mut self, state: StateId, info: StateInfo, layer: usize) -> Result<()> {
        let result = self.lifecycle().state_exit(state, info, layer);
        result.inspect_err(|e| self.report("OnStateExit", state, layer, e))
    }

    /// Attach an addon to `state`. It stays dormant until the coordinator is ready.
    pub fn add_addon(&mut self, state: StateId, addon: impl StateAddon + 'static) -> Result<AddonId> {
        if !self.states.contains_key(&state) {
            return Err(AnimatorError::UnknownState(state));
        }
        let id = self.ids.alloc_addon();
        let ready = self.machine.as_ref().is_some_and(|m| m.is_ready());
        self.addons.insert(id, state, Box::new(addon), ready);
        Ok(id)
    }

    pub fn remove_addon(&mut self, id: AddonId) -> Result<Box<dyn StateAddon>> {
        self.addons
            .remove(id)
            .ok_or(AnimatorError::UnknownAddon(id))
    }

    /// `None` for unknown ids.
    pub fn addon_is_active(&self, id: AddonId) -> Option<bool> {
        self.addons.is_active(id)
    }

    #[inline]
    pub fn addon_count(&self) -> usize {
        self.addons.len()
    }

    fn report(&self, call: &str, state: StateId, layer: usize, err: &AnimatorError) {
        let name = self
            .states
            .get(&state)
            .map_or("<unknown>", |s| s.name.as_str());
        let count = self
            .machine
            .as_ref()
            .map_or(self.layers.len(), AnimatorStateMachine::layer_count);
        log::error!(
            "{call} failed for state '{name}' ({state:?}) on layer {layer} of {count}: {err}"
        );
    }

    fn lifecycle(&mut self) -> Lifecycle<'_> {
        Lifecycle {
            states: &mut self.states,
            machine: self.machine.as_mut(),
            addons: &mut self.addons,
        }
    }
}
