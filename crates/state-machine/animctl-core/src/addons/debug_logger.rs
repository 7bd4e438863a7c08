use crate::event::LifecycleKind;
use crate::layer::{AnimatorLayer, LogFlags};
use crate::state::AnimatorState;

use super::StateAddon;

/// Logs the node's lifecycle at info level, one toggle per channel.
#[derive(Clone, Debug, Default)]
pub struct DebugLogger {
    pub flags: LogFlags,
}

impl DebugLogger {
    pub fn new(flags: LogFlags) -> Self {
        Self { flags }
    }

    pub(crate) fn line(kind: LifecycleKind, layer: &AnimatorLayer, state: &AnimatorState) -> String {
        format!("<{}> {}: {}", layer.name, kind.label(), state.name)
    }

    fn log(&self, kind: LifecycleKind, layer: &AnimatorLayer, state: &AnimatorState) {
        if self.flags.enabled(kind) {
            log::info!("{}", Self::line(kind, layer, state));
        }
    }
}

impl StateAddon for DebugLogger {
    fn on_state_enter(&mut self, layer: &AnimatorLayer, state: &AnimatorState) {
        self.log(LifecycleKind::StateEnter, layer, state);
    }

    fn on_state_update(&mut self, layer: &AnimatorLayer, state: &AnimatorState) {
        self.log(LifecycleKind::StateUpdate, layer, state);
    }

    fn on_state_exit(&mut self, layer: &AnimatorLayer, state: &AnimatorState) {
        self.log(LifecycleKind::StateExit, layer, state);
    }

    fn on_control_enter(&mut self, layer: &AnimatorLayer, state: &AnimatorState) {
        self.log(LifecycleKind::ControlEnter, layer, state);
    }

    fn on_control_update(&mut self, layer: &AnimatorLayer, state: &AnimatorState) {
        self.log(LifecycleKind::ControlUpdate, layer, state);
    }

    fn on_control_exit(&mut self, layer: &AnimatorLayer, state: &AnimatorState) {
        self.log(LifecycleKind::ControlExit, layer, state);
    }
}
