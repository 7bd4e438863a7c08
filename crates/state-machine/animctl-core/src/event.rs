//! Typed publish/subscribe channels.
//!
//! [`Event`] is a plain observer list: listeners run synchronously, in the
//! order they subscribed. [`Promise`] is a one-shot variant that remembers the
//! payload it was resolved with and replays it to late subscribers.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::ids::SubscriptionId;

type Listener<A> = Box<dyn FnMut(&A)>;

pub struct Event<A> {
    next: u64,
    listeners: IndexMap<SubscriptionId, Listener<A>>,
}

impl<A> Default for Event<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> fmt::Debug for Event<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl<A> Event<A> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            next: 0,
            listeners: IndexMap::with_capacity(capacity),
        }
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&A) + 'static,
    {
        let id = SubscriptionId(self.next);
        self.next = self.next.wrapping_add(1);
        self.listeners.insert(id, Box::new(listener));
        id
    }

    /// Remove a listener. Remaining listeners keep their relative order.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.shift_remove(&id).is_some()
    }

    pub fn emit(&mut self, args: &A) {
        for listener in self.listeners.values_mut() {
            listener(args);
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn clear(&mut self) {
        self.listeners.clear();
    }
}

#[derive(Debug)]
enum PromiseState<A> {
    Unresolved,
    Resolved(A),
}

/// One-shot event with replay.
pub struct Promise<A> {
    state: PromiseState<A>,
    listeners: Event<A>,
}

impl<A> Default for Promise<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: fmt::Debug> fmt::Debug for Promise<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Promise")
            .field("state", &self.state)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl<A> Promise<A> {
    pub fn new() -> Self {
        Self {
            state: PromiseState::Unresolved,
            listeners: Event::new(),
        }
    }

    /// Resolve with `value`, notifying current listeners.
    /// Returns `false` (and drops `value`) if already resolved.
    pub fn resolve(&mut self, value: A) -> bool {
        if self.is_resolved() {
            return false;
        }
        self.state = PromiseState::Resolved(value);
        if let PromiseState::Resolved(value) = &self.state {
            self.listeners.emit(value);
        }
        true
    }

    /// Subscribe; runs `listener` immediately with the cached payload when already resolved.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&A) + 'static,
    {
        let mut listener = listener;
        if let PromiseState::Resolved(value) = &self.state {
            listener(value);
        }
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }

    #[inline]
    pub fn is_resolved(&self) -> bool {
        matches!(self.state, PromiseState::Resolved(_))
    }

    pub fn value(&self) -> Option<&A> {
        match &self.state {
            PromiseState::Resolved(value) => Some(value),
            PromiseState::Unresolved => None,
        }
    }
}

/// The six lifecycle channels a tracking node exposes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleKind {
    StateEnter,
    StateUpdate,
    StateExit,
    ControlEnter,
    ControlUpdate,
    ControlExit,
}

impl LifecycleKind {
    pub const ALL: [LifecycleKind; 6] = [
        LifecycleKind::StateEnter,
        LifecycleKind::StateUpdate,
        LifecycleKind::StateExit,
        LifecycleKind::ControlEnter,
        LifecycleKind::ControlUpdate,
        LifecycleKind::ControlExit,
    ];

    #[inline]
    pub fn label(&self) -> &'static str {
        match self {
            Self::StateEnter => "OnStateEnter",
            Self::StateUpdate => "OnStateUpdate",
            Self::StateExit => "OnStateExit",
            Self::ControlEnter => "OnControlEnter",
            Self::ControlUpdate => "OnControlUpdate",
            Self::ControlExit => "OnControlExit",
        }
    }

    /// Derived (control-context) channel as opposed to a raw state channel.
    #[inline]
    pub fn is_control(&self) -> bool {
        matches!(
            self,
            Self::ControlEnter | Self::ControlUpdate | Self::ControlExit
        )
    }
}

/// One [`Event`] per lifecycle channel.
#[derive(Debug)]
pub struct LifecycleEvents<A> {
    pub state_enter: Event<A>,
    pub state_update: Event<A>,
    pub state_exit: Event<A>,
    pub control_enter: Event<A>,
    pub control_update: Event<A>,
    pub control_exit: Event<A>,
}

impl<A> Default for LifecycleEvents<A> {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

impl<A> LifecycleEvents<A> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            state_enter: Event::with_capacity(capacity),
            state_update: Event::with_capacity(capacity),
            state_exit: Event::with_capacity(capacity),
            control_enter: Event::with_capacity(capacity),
            control_update: Event::with_capacity(capacity),
            control_exit: Event::with_capacity(capacity),
        }
    }

    pub fn channel_mut(&mut self, kind: LifecycleKind) -> &mut Event<A> {
        match kind {
            LifecycleKind::StateEnter => &mut self.state_enter,
            LifecycleKind::StateUpdate => &mut self.state_update,
            LifecycleKind::StateExit => &mut self.state_exit,
            LifecycleKind::ControlEnter => &mut self.control_enter,
            LifecycleKind::ControlUpdate => &mut self.control_update,
            LifecycleKind::ControlExit => &mut self.control_exit,
        }
    }

    pub fn clear(&mut self) {
        for kind in LifecycleKind::ALL {
            self.channel_mut(kind).clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn emits_in_subscription_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut ev: Event<u32> = Event::new();
        for tag in ["a", "b", "c"] {
            let seen = seen.clone();
            ev.subscribe(move |v| seen.borrow_mut().push(format!("{tag}{v}")));
        }
        ev.emit(&1);
        assert_eq!(*seen.borrow(), vec!["a1", "b1", "c1"]);
    }

    #[test]
    fn unsubscribe_keeps_order_of_the_rest() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut ev: Event<()> = Event::new();
        let mut ids = Vec::new();
        for tag in 0..3 {
            let seen = seen.clone();
            ids.push(ev.subscribe(move |_| seen.borrow_mut().push(tag)));
        }
        assert!(ev.unsubscribe(ids[1]));
        assert!(!ev.unsubscribe(ids[1]));
        ev.emit(&());
        assert_eq!(*seen.borrow(), vec![0, 2]);
        assert_eq!(ev.len(), 2);
    }

    #[test]
    fn promise_fires_once_and_replays() {
        let hits = Rc::new(RefCell::new(Vec::new()));
        let mut p: Promise<&'static str> = Promise::new();

        let early = hits.clone();
        p.subscribe(move |v| early.borrow_mut().push(format!("early:{v}")));
        assert!(p.resolve("go"));
        assert!(!p.resolve("again"));

        let late = hits.clone();
        p.subscribe(move |v| late.borrow_mut().push(format!("late:{v}")));

        assert_eq!(*hits.borrow(), vec!["early:go", "late:go"]);
        assert_eq!(p.value(), Some(&"go"));
    }

    #[test]
    fn unresolved_promise_does_not_replay() {
        let hits = Rc::new(RefCell::new(0));
        let mut p: Promise<()> = Promise::new();
        let h = hits.clone();
        p.subscribe(move |_| *h.borrow_mut() += 1);
        assert_eq!(*hits.borrow(), 0);
        assert!(!p.is_resolved());
    }

    #[test]
    fn lifecycle_channels_route_by_kind() {
        let hits = Rc::new(RefCell::new(Vec::new()));
        let mut events: LifecycleEvents<u8> = LifecycleEvents::default();
        for kind in LifecycleKind::ALL {
            let hits = hits.clone();
            events
                .channel_mut(kind)
                .subscribe(move |_| hits.borrow_mut().push(kind.label()));
        }
        events.channel_mut(LifecycleKind::ControlExit).emit(&0);
        events.state_enter.emit(&0);
        assert_eq!(*hits.borrow(), vec!["OnControlExit", "OnStateEnter"]);
        assert!(LifecycleKind::ControlUpdate.is_control());
        assert!(!LifecycleKind::StateUpdate.is_control());
    }
}
