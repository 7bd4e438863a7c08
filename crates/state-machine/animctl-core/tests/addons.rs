use std::cell::RefCell;
use std::rc::Rc;

use animctl_core::{
    Animator, AnimatorError, AnimatorLayer, AnimatorState, AudioControllerCfg, AudioSnapshot,
    AudioSnapshotController, DebugLogger, LogFlags, StateAddon, StateInfo,
};

type Calls = Rc<RefCell<Vec<String>>>;

struct Recorder {
    calls: Calls,
}

impl Recorder {
    fn push(&self, what: &str, layer: &AnimatorLayer, state: &AnimatorState) {
        self.calls
            .borrow_mut()
            .push(format!("{what}:{}:{}", layer.name, state.name));
    }
}

impl StateAddon for Recorder {
    fn on_ready(&mut self) {
        self.calls.borrow_mut().push("ready".into());
    }
    fn on_state_enter(&mut self, layer: &AnimatorLayer, state: &AnimatorState) {
        self.push("state_enter", layer, state);
    }
    fn on_state_exit(&mut self, layer: &AnimatorLayer, state: &AnimatorState) {
        self.push("state_exit", layer, state);
    }
    fn on_control_enter(&mut self, layer: &AnimatorLayer, state: &AnimatorState) {
        self.push("control_enter", layer, state);
    }
    fn on_control_exit(&mut self, layer: &AnimatorLayer, state: &AnimatorState) {
        self.push("control_exit", layer, state);
    }
}

struct Snapshot {
    name: &'static str,
    calls: Rc<RefCell<Vec<(&'static str, f32)>>>,
}

impl AudioSnapshot for Snapshot {
    fn transition_to(&mut self, seconds: f32) {
        self.calls.borrow_mut().push((self.name, seconds));
    }
}

#[test]
fn addon_waits_for_the_state_machine() {
    let mut anim = Animator::default();
    anim.add_layer("Base Layer");
    let idle = anim.add_state("Idle");
    let calls: Calls = Rc::default();
    let id = anim
        .add_addon(idle, Recorder { calls: calls.clone() })
        .unwrap();

    assert_eq!(anim.addon_is_active(id), Some(false));
    anim.state_enter(idle, StateInfo::new(1), 0).unwrap();
    assert!(calls.borrow().is_empty());

    anim.add_state_machine();
    assert_eq!(anim.addon_is_active(id), Some(true));
    anim.state_enter(idle, StateInfo::new(1), 0).unwrap();

    assert_eq!(
        *calls.borrow(),
        vec![
            "ready".to_string(),
            "state_enter:Base Layer:Idle".to_string(),
            "control_enter:Base Layer:Idle".to_string(),
        ]
    );
}

#[test]
fn addon_added_after_ready_activates_immediately() {
    let mut anim = Animator::default();
    anim.add_layer("Base Layer");
    let idle = anim.add_state("Idle");
    anim.add_state_machine();

    let calls: Calls = Rc::default();
    let id = anim
        .add_addon(idle, Recorder { calls: calls.clone() })
        .unwrap();
    assert_eq!(anim.addon_is_active(id), Some(true));
    assert_eq!(*calls.borrow(), vec!["ready".to_string()]);

    // A second enable does not replay on_ready.
    anim.enable_state_machine().unwrap();
    assert_eq!(calls.borrow().len(), 1);
}

#[test]
fn addons_only_see_their_own_node() {
    let mut anim = Animator::default();
    anim.add_layer("Base Layer");
    let idle = anim.add_state("Idle");
    let run = anim.add_state("Run");
    anim.add_state_machine();

    let calls: Calls = Rc::default();
    anim.add_addon(run, Recorder { calls: calls.clone() })
        .unwrap();

    anim.state_enter(idle, StateInfo::new(1), 0).unwrap();
    anim.state_enter(run, StateInfo::new(2), 0).unwrap();
    anim.state_exit(idle, StateInfo::new(1), 0).unwrap();

    assert_eq!(
        *calls.borrow(),
        vec![
            "ready".to_string(),
            "state_enter:Base Layer:Run".to_string(),
            "control_enter:Base Layer:Run".to_string(),
        ]
    );
}

#[test]
fn audio_controller_follows_control() {
    let mut anim = Animator::default();
    anim.add_layer("Base Layer");
    let idle = anim.add_state("Idle");
    let run = anim.add_state("Run");
    anim.add_state_machine();

    let calls = Rc::new(RefCell::new(Vec::new()));
    let controller = AudioSnapshotController::new(AudioControllerCfg {
        enter_seconds: 0.25,
        exit_seconds: 2.0,
    })
    .with_during_control(Snapshot {
        name: "combat",
        calls: calls.clone(),
    })
    .with_after_control(Snapshot {
        name: "ambient",
        calls: calls.clone(),
    });
    anim.add_addon(idle, controller).unwrap();

    anim.state_enter(idle, StateInfo::new(1), 0).unwrap();
    anim.state_update(idle, StateInfo::new(1), 0).unwrap();
    anim.state_enter(run, StateInfo::new(2), 0).unwrap();
    anim.state_exit(idle, StateInfo::new(1), 0).unwrap();

    assert_eq!(*calls.borrow(), vec![("combat", 0.25), ("ambient", 2.0)]);
}

#[test]
fn audio_controller_without_snapshots_is_inert() {
    let mut anim = Animator::default();
    anim.add_layer("Base Layer");
    let idle = anim.add_state("Idle");
    anim.add_state_machine();
    anim.add_addon(idle, AudioSnapshotController::default())
        .unwrap();
    anim.state_enter(idle, StateInfo::new(1), 0).unwrap();
    anim.state_exit(idle, StateInfo::new(1), 0).unwrap();
}

#[test]
fn removed_addons_stop_receiving_calls() {
    let mut anim = Animator::default();
    anim.add_layer("Base Layer");
    let idle = anim.add_state("Idle");
    anim.add_state_machine();

    let calls: Calls = Rc::default();
    let id = anim
        .add_addon(idle, Recorder { calls: calls.clone() })
        .unwrap();
    anim.remove_addon(id).unwrap();
    assert_eq!(anim.addon_count(), 0);
    assert_eq!(anim.remove_addon(id).err(), Some(AnimatorError::UnknownAddon(id)));

    anim.state_enter(idle, StateInfo::new(1), 0).unwrap();
    assert_eq!(*calls.borrow(), vec!["ready".to_string()]);
}

#[test]
fn removing_a_state_drops_its_addons() {
    let mut anim = Animator::default();
    let idle = anim.add_state("Idle");
    anim.add_addon(idle, DebugLogger::new(LogFlags::all()))
        .unwrap();
    anim.add_addon(idle, DebugLogger::default()).unwrap();
    assert_eq!(anim.addon_count(), 2);

    anim.remove_state(idle).unwrap();
    assert_eq!(anim.addon_count(), 0);
    assert_eq!(
        anim.add_addon(idle, DebugLogger::default()).unwrap_err(),
        AnimatorError::UnknownState(idle)
    );
}
