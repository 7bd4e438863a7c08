//! animctl core (engine-agnostic)
//!
//! Derives a non-overlapping "control context" signal stream from the raw
//! enter/update/exit callbacks an external animation engine emits per state.
//! During a blended transition two states are active at once; this crate
//! guarantees that exactly one tracking node per layer is ever in control.
//!
//! The host engine drives [`Animator::state_enter`], [`Animator::state_update`]
//! and [`Animator::state_exit`]. Consumers subscribe to node-level channels on
//! [`AnimatorState`], to layer-scoped channels on [`AnimatorStateMachine`], or
//! attach a [`StateAddon`].

pub mod addons;
pub mod animator;
pub mod config;
pub mod error;
pub mod event;
pub mod ids;
pub mod info;
pub mod layer;
mod lifecycle;
pub mod machine;
pub mod state;

// Re-exports for consumers (hosts and adapters)
pub use addons::{
    AudioControllerCfg, AudioSnapshot, AudioSnapshotController, DebugLogger, StateAddon,
};
pub use animator::Animator;
pub use config::Config;
pub use error::{AnimatorError, Result};
pub use event::{Event, LifecycleEvents, LifecycleKind, Promise};
pub use ids::{AddonId, IdAllocator, StateId, SubscriptionId};
pub use info::StateInfo;
pub use layer::{AnimatorLayer, LogFlags};
pub use machine::{AnimatorHandle, AnimatorStateMachine, LayerSignal, MachineReady};
pub use state::{AnimatorState, Binding, StateSignal};
