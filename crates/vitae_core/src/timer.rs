//! Single-shot timer service with cancel-and-reschedule semantics.
//!
//! # Responsibility
//! - Provide the one deferral abstraction shared by the text debounce and
//!   the post-mutation settle delay.
//! - Keep time fully cooperative: the caller advances a logical clock.
//!
//! # Invariants
//! - Scheduling an already pending slot replaces its deadline; only the last
//!   request in a burst fires (strictly trailing-edge).
//! - A fired or cancelled slot is no longer pending.

use std::collections::BTreeMap;

/// Named single-shot slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TimerSlot {
    /// Trailing-edge debounce for free-text input.
    TextDebounce,
    /// Short settle delay after programmatic structural mutation.
    MutationSettle,
}

/// Cooperative single-shot timer table over a logical millisecond clock.
#[derive(Debug, Default)]
pub struct TimerService {
    now_ms: u64,
    deadlines: BTreeMap<TimerSlot, u64>,
}

impl TimerService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current logical time.
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Schedules one slot, cancelling any pending deadline for it first.
    pub fn schedule(&mut self, slot: TimerSlot, delay_ms: u64) {
        self.deadlines.insert(slot, self.now_ms + delay_ms);
    }

    /// Cancels one pending slot. Returns whether it was pending.
    pub fn cancel(&mut self, slot: TimerSlot) -> bool {
        self.deadlines.remove(&slot).is_some()
    }

    /// Returns whether one slot has a pending deadline.
    pub fn is_pending(&self, slot: TimerSlot) -> bool {
        self.deadlines.contains_key(&slot)
    }

    /// Advances the clock and returns the slots that fired, in deadline
    /// order.
    pub fn advance(&mut self, delta_ms: u64) -> Vec<TimerSlot> {
        self.now_ms += delta_ms;
        let now = self.now_ms;
        let mut fired: Vec<(u64, TimerSlot)> = self
            .deadlines
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(slot, deadline)| (*deadline, *slot))
            .collect();
        fired.sort();
        for (_, slot) in &fired {
            self.deadlines.remove(slot);
        }
        fired.into_iter().map(|(_, slot)| slot).collect()
    }
}
