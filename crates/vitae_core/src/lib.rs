//! Core synchronization engine for the Vitae profile editor.
//! This crate is the single source of truth for tree, path, and skill
//! invariants.

pub mod contact;
pub mod dispatch;
pub mod form;
pub mod logging;
pub mod model;
pub mod service;
pub mod timer;

pub use contact::{ContactDirectory, ContactInfo, ContactRevealError};
pub use dispatch::{ActionKind, ActionRegistry, SyncDirective};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::document::{Container, ContainerAddr, ContainerKind, ProfileDocument};
pub use model::node::{
    CompanyKind, MetaItemKind, Node, NodeId, NodePayload, NodeRole, TextField,
};
pub use service::reorder::{
    DragItem, DropEvent, DropOutcome, ReorderError, SortableOptions, SortableRegistry,
};
pub use service::session::{
    EditingSession, RemovalChoice, SessionError, MUTATION_SETTLE_MS, SKILL_INTERCHANGE_GROUP,
    TEXT_DEBOUNCE_MS,
};
pub use service::skill_sync::ManualSkillSet;
pub use timer::{TimerService, TimerSlot};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
