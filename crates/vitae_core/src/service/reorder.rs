//! Container reordering model.
//!
//! # Responsibility
//! - Register per-container drag behavior and keep registration idempotent.
//! - Apply completed drop events: intra-container reorders and
//!   interchange-group transfers.
//!
//! # Invariants
//! - After any applied drop, every affected container has contiguous
//!   `sort_order = position` for all children.
//! - Cross-container movement is allowed only between containers sharing an
//!   interchange group.
//! - Every applied drop requires a follow-up renumbering pass; shifting one
//!   node can change indices of unrelated siblings and of the destination
//!   subtree.

use crate::model::document::{ContainerAddr, ContainerKind, ProfileDocument};
use crate::model::node::NodeId;
use crate::service::transfer;
use log::debug;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Drag configuration for one container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortableOptions {
    /// CSS-style selector the drag capability uses as its grab handle.
    pub handle_selector: String,
    /// Whether children may be reordered within the container.
    pub allow_sort: bool,
    /// Interchange group permitting cross-container membership transfer.
    pub interchange_group: Option<String>,
}

impl SortableOptions {
    /// Sortable list with a drag handle and no cross-container movement.
    pub fn sortable(handle_selector: impl Into<String>) -> Self {
        Self {
            handle_selector: handle_selector.into(),
            allow_sort: true,
            interchange_group: None,
        }
    }

    /// Member of an interchange group, optionally sortable in place.
    pub fn interchange(
        handle_selector: impl Into<String>,
        allow_sort: bool,
        group: impl Into<String>,
    ) -> Self {
        Self {
            handle_selector: handle_selector.into(),
            allow_sort,
            interchange_group: Some(group.into()),
        }
    }
}

/// The thing being dragged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragItem {
    /// A tree node, addressed by session handle.
    Node(NodeId),
    /// An identity-less detected chip, addressed by name.
    Chip(String),
}

/// One completed drop reported by the drag capability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropEvent {
    pub source: ContainerAddr,
    pub destination: ContainerAddr,
    pub item: DragItem,
    /// Final index within the destination container.
    pub to_index: usize,
}

/// Result of applying one drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropOutcome {
    /// Whether any container content actually changed.
    pub moved: bool,
    /// Whether the drop touched the skill pool or a skills container and a
    /// pool sync cycle should follow.
    pub skill_relevant: bool,
}

/// Errors from the reordering model.
///
/// These indicate caller misuse; a well-behaved drag capability never
/// produces them. Missing items and absent views are silent no-ops instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReorderError {
    /// Drop referenced a container that was never attached.
    ContainerNotAttached(ContainerAddr),
    /// Cross-container drop between containers without a shared group.
    InterchangeViolation {
        source: ContainerAddr,
        destination: ContainerAddr,
    },
}

impl Display for ReorderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ContainerNotAttached(addr) => {
                write!(f, "container is not attached for dragging: {addr:?}")
            }
            Self::InterchangeViolation {
                source,
                destination,
            } => write!(
                f,
                "cross-container drop outside interchange group: {source:?} -> {destination:?}"
            ),
        }
    }
}

impl Error for ReorderError {}

/// Registry of drag-enabled containers.
#[derive(Debug, Default)]
pub struct SortableRegistry {
    entries: BTreeMap<ContainerAddr, SortableOptions>,
}

impl SortableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers drag behavior for one container.
    ///
    /// Idempotent: attaching twice to the same container is a no-op and
    /// keeps the first configuration. Returns whether a new registration
    /// happened.
    pub fn attach(&mut self, addr: ContainerAddr, options: SortableOptions) -> bool {
        if self.entries.contains_key(&addr) {
            return false;
        }
        self.entries.insert(addr, options);
        true
    }

    /// Returns the configuration for one attached container.
    pub fn options(&self, addr: ContainerAddr) -> Option<&SortableOptions> {
        self.entries.get(&addr)
    }

    /// Returns whether one container is attached.
    pub fn is_attached(&self, addr: ContainerAddr) -> bool {
        self.entries.contains_key(&addr)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Applies one completed drop to the document and pool.
///
/// Intra-container: removes the item from its current position and inserts
/// it at the final index, then rewrites `sort_order` across the container.
/// Cross-container: validates the interchange group and delegates identity
/// handling to the transfer protocol.
///
/// The caller must schedule a full renumbering pass after every applied
/// drop, and a pool sync cycle when the outcome is skill-relevant.
pub fn apply_drop(
    document: &mut ProfileDocument,
    pool: &mut Vec<String>,
    registry: &SortableRegistry,
    event: &DropEvent,
) -> Result<DropOutcome, ReorderError> {
    let source_options = registry
        .options(event.source)
        .ok_or(ReorderError::ContainerNotAttached(event.source))?;
    let destination_options = registry
        .options(event.destination)
        .ok_or(ReorderError::ContainerNotAttached(event.destination))?;

    let skill_relevant = is_skill_side(event.source) || is_skill_side(event.destination);

    if event.source == event.destination {
        if !source_options.allow_sort {
            return Ok(DropOutcome {
                moved: false,
                skill_relevant,
            });
        }
        let moved = reorder_within(document, pool, event);
        return Ok(DropOutcome {
            moved,
            skill_relevant,
        });
    }

    let shared_group = match (
        &source_options.interchange_group,
        &destination_options.interchange_group,
    ) {
        (Some(from), Some(to)) if from == to => from.clone(),
        _ => {
            return Err(ReorderError::InterchangeViolation {
                source: event.source,
                destination: event.destination,
            });
        }
    };
    debug!(
        "event=drop_transfer module=reorder status=ok group={shared_group} to_index={}",
        event.to_index
    );

    let moved = transfer_across(document, pool, event);
    Ok(DropOutcome {
        moved,
        skill_relevant,
    })
}

fn is_skill_side(addr: ContainerAddr) -> bool {
    match addr {
        ContainerAddr::SkillPool => true,
        ContainerAddr::Root(kind) | ContainerAddr::Child { kind, .. } => {
            kind == ContainerKind::Skills
        }
    }
}

fn reorder_within(
    document: &mut ProfileDocument,
    pool: &mut Vec<String>,
    event: &DropEvent,
) -> bool {
    if event.source == ContainerAddr::SkillPool {
        // Pool chips never sort in place; membership is rebuilt wholesale.
        let DragItem::Chip(name) = &event.item else {
            return false;
        };
        let Some(from) = pool.iter().position(|entry| entry == name) else {
            return false;
        };
        let chip = pool.remove(from);
        let to = event.to_index.min(pool.len());
        pool.insert(to, chip);
        return true;
    }

    let DragItem::Node(node_id) = &event.item else {
        return false;
    };
    let Some(container) = document.container_mut(event.source) else {
        return false;
    };
    let Some(node) = container.take(*node_id) else {
        return false;
    };
    container.insert(event.to_index, node);
    container.reassign_sort_orders();
    true
}

fn transfer_across(
    document: &mut ProfileDocument,
    pool: &mut Vec<String>,
    event: &DropEvent,
) -> bool {
    // Pool -> category: materialize the chip into a full assigned entry.
    if event.source == ContainerAddr::SkillPool {
        let DragItem::Chip(name) = &event.item else {
            return false;
        };
        let Some(at) = pool.iter().position(|entry| entry == name) else {
            return false;
        };
        let name = pool.remove(at);
        let Some(destination) = document.container_mut(event.destination) else {
            // Destination view disappeared; restore the chip untouched.
            pool.insert(at.min(pool.len()), name);
            return false;
        };
        let mut entry = transfer::materialize_chip(name);
        entry.sort_order = event.to_index as i64;
        destination.insert(event.to_index, entry);
        destination.reassign_sort_orders();
        return true;
    }

    let DragItem::Node(node_id) = &event.item else {
        return false;
    };
    if event.destination != ContainerAddr::SkillPool
        && document.container_mut(event.destination).is_none()
    {
        return false;
    }
    let Some(source) = document.container_mut(event.source) else {
        return false;
    };
    let Some(mut node) = source.take(*node_id) else {
        return false;
    };
    source.reassign_sort_orders();

    // Category -> pool: the entry dissolves back into an identity-less chip
    // until the next rebuild.
    if event.destination == ContainerAddr::SkillPool {
        let name = skill_name(&node).unwrap_or_default();
        if !name.is_empty() && !pool.iter().any(|entry| entry == &name) {
            let to = event.to_index.min(pool.len());
            pool.insert(to, name);
        }
        return true;
    }

    // Category -> category: persisted identity is scoped to the source
    // category and must not travel.
    transfer::reset_identity(&mut node);
    let Some(destination) = document.container_mut(event.destination) else {
        return false;
    };
    destination.insert(event.to_index, node);
    destination.reassign_sort_orders();
    true
}

fn skill_name(node: &crate::model::node::Node) -> Option<String> {
    match &node.payload {
        crate::model::node::NodePayload::Skill { name } => Some(name.clone()),
        _ => None,
    }
}
