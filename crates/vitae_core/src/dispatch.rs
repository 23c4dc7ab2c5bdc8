//! Action subscription registry.
//!
//! # Responsibility
//! - Map semantic editor actions to the sync work they require.
//! - Replace implicit target-sniffing dispatch with an explicit,
//!   inspectable registry.
//!
//! # Invariants
//! - Directive lists are deduplicated; subscribing twice is a no-op.
//! - The registry itself never executes work; the session interprets
//!   directives.

use std::collections::BTreeMap;

/// Semantic editor action that can trigger synchronization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ActionKind {
    Reorder,
    ToggleVisibility,
    TextChanged,
    Add,
    Remove,
    AddManualSkill,
}

/// Unit of deferred or immediate sync work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncDirective {
    /// Run the path renumbering pass immediately.
    RenumberNow,
    /// Run a full skill sync cycle immediately.
    SyncNow,
    /// Schedule a sync cycle behind the text debounce window.
    SyncDebounced,
    /// Schedule a sync cycle behind the post-mutation settle delay.
    SyncAfterSettle,
}

/// Registry of action → directive subscriptions.
#[derive(Debug, Default)]
pub struct ActionRegistry {
    subscriptions: BTreeMap<ActionKind, Vec<SyncDirective>>,
}

impl ActionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the engine's default wiring.
    ///
    /// Reorder handling is intentionally renumber-only here; the session
    /// adds a settle-delayed sync when a drop turns out to be
    /// skill-relevant.
    pub fn with_default_wiring() -> Self {
        let mut registry = Self::new();
        registry.subscribe(ActionKind::Reorder, SyncDirective::RenumberNow);
        registry.subscribe(ActionKind::ToggleVisibility, SyncDirective::SyncNow);
        registry.subscribe(ActionKind::TextChanged, SyncDirective::SyncDebounced);
        registry.subscribe(ActionKind::Add, SyncDirective::SyncAfterSettle);
        registry.subscribe(ActionKind::Remove, SyncDirective::SyncAfterSettle);
        registry.subscribe(ActionKind::AddManualSkill, SyncDirective::SyncNow);
        registry
    }

    /// Subscribes one directive to one action. Duplicate subscriptions are
    /// no-ops. Returns whether a new subscription happened.
    pub fn subscribe(&mut self, action: ActionKind, directive: SyncDirective) -> bool {
        let directives = self.subscriptions.entry(action).or_default();
        if directives.contains(&directive) {
            return false;
        }
        directives.push(directive);
        true
    }

    /// Returns the directives subscribed to one action, in subscription
    /// order.
    pub fn directives(&self, action: ActionKind) -> &[SyncDirective] {
        self.subscriptions
            .get(&action)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.subscriptions.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
