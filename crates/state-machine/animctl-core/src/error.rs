use thiserror::Error;

use crate::ids::{AddonId, StateId};

/// Errors surfaced to the host driving the raw callbacks.
///
/// A missing coordinator is not reported here. It is logged once per node and
/// the node degrades to raw pass-through.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnimatorError {
    #[error("layer index {index} out of range ({count} layers)")]
    LayerOutOfRange { index: usize, count: usize },
    #[error("unknown state {0:?}")]
    UnknownState(StateId),
    #[error("unknown addon {0:?}")]
    UnknownAddon(AddonId),
    #[error("animator has no state machine attached")]
    MissingStateMachine,
    #[error("config parse error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, AnimatorError>;
