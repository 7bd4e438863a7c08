//! Coordinator: owns the layer cursors and re-emits node events per layer.
//!
//! Lifecycle mirrors a host component:
//! - `enable`: rebuild cursors if empty, discover tracking nodes, resolve `ready`
//! - `disable`: drop every registration (cursor tracking itself continues)
//! - `validate`: rename pass over the cursors, never drops or reorders them

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{AnimatorError, Result};
use crate::event::{LifecycleEvents, LifecycleKind, Promise};
use crate::ids::{StateId, SubscriptionId};
use crate::layer::AnimatorLayer;

/// What the coordinator needs from the engine-side handle.
pub trait AnimatorHandle {
    fn layer_count(&self) -> usize;
    fn layer_name(&self, index: usize) -> Option<&str>;
    /// Tracking nodes currently attached, in engine order.
    fn behaviours(&self) -> Vec<StateId>;
}

/// Payload of the layer-scoped channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerSignal {
    pub layer: usize,
    pub state: StateId,
}

/// Payload of the one-shot ready promise.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineReady {
    pub layer_count: usize,
    pub state_count: usize,
}

#[derive(Debug)]
pub struct AnimatorStateMachine {
    cfg: Config,
    layers: Vec<AnimatorLayer>,
    // Index-aligned with `layers`.
    layer_events: Vec<LifecycleEvents<LayerSignal>>,
    registered: HashSet<StateId>,
    enabled: bool,
    ready: Promise<MachineReady>,
}

impl Default for AnimatorStateMachine {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl AnimatorStateMachine {
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            layers: Vec::new(),
            layer_events: Vec::new(),
            registered: HashSet::new(),
            enabled: false,
            ready: Promise::new(),
        }
    }

    #[inline]
    pub fn layers(&self) -> &[AnimatorLayer] {
        &self.layers
    }

    #[inline]
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn layer(&self, index: usize) -> Result<&AnimatorLayer> {
        let count = self.layers.len();
        self.layers
            .get(index)
            .ok_or(AnimatorError::LayerOutOfRange { index, count })
    }

    pub fn layer_mut(&mut self, index: usize) -> Result<&mut AnimatorLayer> {
        let count = self.layers.len();
        self.layers
            .get_mut(index)
            .ok_or(AnimatorError::LayerOutOfRange { index, count })
    }

    /// First cursor whose name matches, with its index.
    pub fn layer_by_name(&self, name: &str) -> Option<(usize, &AnimatorLayer)> {
        self.layers.iter().enumerate().find(|(_, l)| l.name == name)
    }

    pub fn layer_events_mut(&mut self, index: usize) -> Result<&mut LifecycleEvents<LayerSignal>> {
        let count = self.layer_events.len();
        self.layer_events
            .get_mut(index)
            .ok_or(AnimatorError::LayerOutOfRange { index, count })
    }

    /// Subscribe to one layer-scoped channel.
    pub fn subscribe<F>(&mut self, layer: usize, kind: LifecycleKind, listener: F) -> Result<SubscriptionId>
    where
        F: FnMut(&LayerSignal) + 'static,
    {
        Ok(self.layer_events_mut(layer)?.channel_mut(kind).subscribe(listener))
    }

    pub fn unsubscribe(&mut self, layer: usize, kind: LifecycleKind, id: SubscriptionId) -> Result<bool> {
        Ok(self.layer_events_mut(layer)?.channel_mut(kind).unsubscribe(id))
    }

    pub fn is_current_state(&self, layer: usize, state: StateId) -> Result<bool> {
        Ok(self.layer(layer)?.is_current_state(state))
    }

    /// Populate one cursor per engine layer when empty; otherwise refresh names in place.
    /// Live cursor state survives. Indices the handle reports beyond the last cursor
    /// get fresh cursors appended, keeping index alignment with the engine.
    pub fn rebuild_layers_if_empty(&mut self, handle: &dyn AnimatorHandle) {
        let was_empty = self.layers.is_empty();
        for index in 0..handle.layer_count() {
            let name = handle.layer_name(index).unwrap_or_default();
            match self.layers.get_mut(index) {
                Some(layer) => {
                    if layer.name != name {
                        layer.name = name.to_string();
                    }
                }
                None => self.push_layer(name),
            }
        }
        if was_empty {
            log::debug!("built {} layer cursors", self.layers.len());
        }
    }

    pub fn validate(&mut self, handle: &dyn AnimatorHandle) {
        self.rebuild_layers_if_empty(handle);
    }

    pub fn enable(&mut self, handle: &dyn AnimatorHandle) {
        self.rebuild_layers_if_empty(handle);
        self.register_events(handle);
        self.enabled = true;
    }

    pub fn disable(&mut self) {
        self.deregister_events();
        self.enabled = false;
    }

    /// Discover tracking nodes and subscribe to them. Always deregisters first,
    /// so repeated enables never produce duplicate layer events.
    pub fn register_events(&mut self, handle: &dyn AnimatorHandle) {
        self.deregister_events();
        self.registered.extend(handle.behaviours());
        log::debug!("registered {} tracking nodes", self.registered.len());

        let ready = MachineReady {
            layer_count: self.layers.len(),
            state_count: self.registered.len(),
        };
        self.ready.resolve(ready);
    }

    pub fn deregister_events(&mut self) {
        self.registered.clear();
    }

    #[inline]
    pub fn is_registered(&self, state: StateId) -> bool {
        self.registered.contains(&state)
    }

    #[inline]
    pub fn registered_count(&self) -> usize {
        self.registered.len()
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        self.ready.is_resolved()
    }

    /// Run `listener` once the machine is ready; immediately if it already is.
    pub fn on_ready<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&MachineReady) + 'static,
    {
        self.ready.subscribe(listener)
    }

    pub(crate) fn check_layer(&self, index: usize) -> Result<()> {
        self.layer(index).map(|_| ())
    }

    /// Re-emit a node event on its layer's channel, if the node is registered.
    pub(crate) fn forward(&mut self, kind: LifecycleKind, signal: LayerSignal) {
        if !self.registered.contains(&signal.state) {
            return;
        }
        if let Some(events) = self.layer_events.get_mut(signal.layer) {
            events.channel_mut(kind).emit(&signal);
        }
    }

    fn push_layer(&mut self, name: &str) {
        self.layers
            .push(AnimatorLayer::new(name).with_logging(self.cfg.layer_logging));
        self.layer_events
            .push(LifecycleEvents::with_capacity(self.cfg.listener_capacity));
    }
}
