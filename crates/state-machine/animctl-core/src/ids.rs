//! Identifiers and simple allocators for core entities.

use serde::{Deserialize, Serialize};

/// A tracking node attached to an animation state.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StateId(pub u32);

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct AddonId(pub u32);

/// Token returned by [`crate::Event::subscribe`]; only meaningful for the channel that issued it.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(pub u64);

/// Monotonic allocator for StateId and AddonId.
/// IDs are opaque externally.
#[derive(Default, Debug)]
pub struct IdAllocator {
    next_state: u32,
    next_addon: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_state(&mut self) -> StateId {
        let id = StateId(self.next_state);
        self.next_state = self.next_state.wrapping_add(1);
        id
    }

    #[inline]
    pub fn alloc_addon(&mut self) -> AddonId {
        let id = AddonId(self.next_addon);
        self.next_addon = self.next_addon.wrapping_add(1);
        id
    }

    #[inline]
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
