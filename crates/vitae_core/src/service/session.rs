//! Editing session facade.
//!
//! # Responsibility
//! - Own the document, manual skill set, pool, registries, timers, and drag
//!   state for one editing session.
//! - Route semantic actions through the subscription registry into sync
//!   work.
//!
//! # Invariants
//! - Every structural mutation leaves the affected containers with
//!   contiguous `sort_order = position`.
//! - A sync cycle never runs while a drag ghost is present; guarded-out
//!   cycles are skipped in full and not queued.
//! - Submission renumbers once more immediately before flattening, even if
//!   a debounce window has not elapsed.

use crate::dispatch::{ActionKind, ActionRegistry, SyncDirective};
use crate::form;
use crate::model::document::{ContainerAddr, ContainerKind, ProfileDocument};
use crate::model::node::{
    CompanyKind, MetaItemKind, Node, NodeId, NodePayload, NodeRole, TextField,
};
use crate::service::renumber::{self, path_prefix};
use crate::service::reorder::{
    apply_drop, DropEvent, DropOutcome, ReorderError, SortableOptions, SortableRegistry,
};
use crate::service::skill_sync::{
    assigned_skill_names, compute_valid_skills, prune_stale_assignments, rebuild_pool,
    ManualSkillSet,
};
use crate::timer::{TimerService, TimerSlot};
use log::{debug, info};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Trailing-edge debounce window for free-text edits.
pub const TEXT_DEBOUNCE_MS: u64 = 300;
/// Settle delay after structural mutation, long enough for the drag
/// capability to finish its own bookkeeping.
pub const MUTATION_SETTLE_MS: u64 = 50;
/// Interchange group shared by the pool and every category skill container.
pub const SKILL_INTERCHANGE_GROUP: &str = "shared-skills";

const DRAG_HANDLE: &str = ".drag-handle";

/// User decision for a destructive removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalChoice {
    /// Proceed; the node and all descendants are removed.
    Confirm,
    /// Decline; all state is left unchanged.
    Cancel,
}

/// Errors from session operations.
///
/// These indicate caller misuse; normal structural mutation never fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Unknown node handle.
    NodeNotFound(NodeId),
    /// The addressed role has no such text slot.
    FieldNotOnRole { role: NodeRole, field: TextField },
    /// The parent role does not own a container of the requested kind.
    ContainerMissing { parent: NodeId, kind: ContainerKind },
    /// Reordering model rejected the drop.
    Reorder(ReorderError),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NodeNotFound(id) => write!(f, "node not found: {id}"),
            Self::FieldNotOnRole { role, field } => {
                write!(f, "role {role:?} has no text slot {field:?}")
            }
            Self::ContainerMissing { parent, kind } => {
                write!(f, "node {parent} owns no {kind:?} container")
            }
            Self::Reorder(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Reorder(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ReorderError> for SessionError {
    fn from(value: ReorderError) -> Self {
        Self::Reorder(value)
    }
}

/// One interactive editing session over a profile document.
pub struct EditingSession {
    document: ProfileDocument,
    manual_skills: ManualSkillSet,
    pool: Vec<String>,
    sortables: SortableRegistry,
    actions: ActionRegistry,
    timers: TimerService,
    dragging: bool,
}

impl EditingSession {
    /// Opens a session over a loaded document.
    ///
    /// Every name already assigned in a category is seeded into the manual
    /// set, so server-loaded assignments survive the first sync cycle. Then
    /// drag behavior is attached across the tree and an initial cycle runs.
    pub fn new(document: ProfileDocument) -> Self {
        let mut manual_skills = ManualSkillSet::new();
        for name in assigned_skill_names(&document) {
            manual_skills.add(&name);
        }

        let mut session = Self {
            document,
            manual_skills,
            pool: Vec::new(),
            sortables: SortableRegistry::new(),
            actions: ActionRegistry::with_default_wiring(),
            timers: TimerService::new(),
            dragging: false,
        };
        session.attach_tree();
        session.sync_cycle();
        info!(
            "event=session_start module=session status=ok manual_seed={} attached={}",
            session.manual_skills.len(),
            session.sortables.len()
        );
        session
    }

    pub fn document(&self) -> &ProfileDocument {
        &self.document
    }

    /// Current detected-chip names, in scan order.
    pub fn pool(&self) -> &[String] {
        &self.pool
    }

    pub fn manual_skills(&self) -> &ManualSkillSet {
        &self.manual_skills
    }

    pub fn sortables(&self) -> &SortableRegistry {
        &self.sortables
    }

    pub fn actions(&self) -> &ActionRegistry {
        &self.actions
    }

    /// Mutable access for callers extending the default action wiring.
    pub fn actions_mut(&mut self) -> &mut ActionRegistry {
        &mut self.actions
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    // ------------------------------------------------------------------
    // Drag lifecycle
    // ------------------------------------------------------------------

    /// Marks the structure as mid-mutation; sync cycles no-op until the
    /// drag completes or is cancelled.
    pub fn begin_drag(&mut self) {
        self.dragging = true;
    }

    /// Clears the ghost state without applying any drop.
    pub fn cancel_drag(&mut self) {
        self.dragging = false;
    }

    /// Applies one completed drop.
    ///
    /// The ghost state clears first, then the reordering model runs, then a
    /// full renumbering pass. Skill-relevant drops additionally schedule a
    /// settle-delayed sync cycle.
    pub fn complete_drop(&mut self, event: &DropEvent) -> Result<DropOutcome, SessionError> {
        self.dragging = false;
        let outcome = apply_drop(&mut self.document, &mut self.pool, &self.sortables, event)?;
        self.run_directives(ActionKind::Reorder);
        if outcome.skill_relevant {
            self.timers
                .schedule(TimerSlot::MutationSettle, MUTATION_SETTLE_MS);
        }
        Ok(outcome)
    }

    // ------------------------------------------------------------------
    // Field edits
    // ------------------------------------------------------------------

    /// Flips one node's visibility flag. Returns the new state.
    pub fn toggle_visibility(&mut self, node_id: NodeId) -> Result<bool, SessionError> {
        let node = self
            .document
            .find_node_mut(node_id)
            .ok_or(SessionError::NodeNotFound(node_id))?;
        node.visible = !node.visible;
        let state = node.visible;
        self.run_directives(ActionKind::ToggleVisibility);
        Ok(state)
    }

    /// Writes one free-text slot addressed by semantic key.
    pub fn set_text(
        &mut self,
        node_id: NodeId,
        field: TextField,
        value: impl Into<String>,
    ) -> Result<(), SessionError> {
        let node = self
            .document
            .find_node_mut(node_id)
            .ok_or(SessionError::NodeNotFound(node_id))?;
        let role = node.role();
        if !node.set_text(field, value) {
            return Err(SessionError::FieldNotOnRole { role, field });
        }
        self.run_directives(ActionKind::TextChanged);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Structural adds
    // ------------------------------------------------------------------

    pub fn add_key_role(&mut self) -> NodeId {
        self.append_root(
            ContainerKind::KeyRoles,
            Node::new(NodePayload::KeyRole {
                role_content: String::new(),
            }),
        )
    }

    pub fn add_company(&mut self) -> NodeId {
        self.append_root(
            ContainerKind::Companies,
            Node::new(NodePayload::Company {
                name: String::new(),
                kind: CompanyKind::Work,
            }),
        )
    }

    pub fn add_education(&mut self) -> NodeId {
        self.append_root(
            ContainerKind::Educations,
            Node::new(NodePayload::Education {
                institution: String::new(),
                major: String::new(),
                gpa: String::new(),
                period: String::new(),
                additional_info: String::new(),
            }),
        )
    }

    pub fn add_certification(&mut self) -> NodeId {
        self.append_root(
            ContainerKind::Certifications,
            Node::new(NodePayload::Certification {
                name: String::new(),
                issue_date: String::new(),
                additional_info: String::new(),
            }),
        )
    }

    pub fn add_skill_category(&mut self) -> NodeId {
        self.append_root(
            ContainerKind::SkillCategories,
            Node::new(NodePayload::SkillCategory {
                name: String::new(),
            }),
        )
    }

    /// Adds a scaffolded project under one company.
    ///
    /// The scaffold carries the four standard meta items (duration, summary,
    /// tech-stack group with one empty stack, content group with one problem
    /// holding one solution and one impact), mirroring what a fresh project
    /// looks like in the editor.
    pub fn add_project(&mut self, company_id: NodeId) -> Result<NodeId, SessionError> {
        let company = self
            .document
            .find_node(company_id)
            .ok_or(SessionError::NodeNotFound(company_id))?;
        let kind = match &company.payload {
            NodePayload::Company { kind, .. } => *kind,
            _ => {
                return Err(SessionError::ContainerMissing {
                    parent: company_id,
                    kind: ContainerKind::Projects,
                });
            }
        };
        let project = project_scaffold(kind);
        self.append_child(company_id, ContainerKind::Projects, project)
    }

    pub fn add_tech_stack(&mut self, meta_id: NodeId) -> Result<NodeId, SessionError> {
        self.append_child(
            meta_id,
            ContainerKind::TechStacks,
            Node::new(NodePayload::TechStack {
                tech_name: String::new(),
            }),
        )
    }

    /// Adds a problem with one empty solution and one empty impact.
    pub fn add_problem(&mut self, meta_id: NodeId) -> Result<NodeId, SessionError> {
        self.append_child(meta_id, ContainerKind::Problems, problem_scaffold())
    }

    pub fn add_solution(&mut self, problem_id: NodeId) -> Result<NodeId, SessionError> {
        self.append_child(
            problem_id,
            ContainerKind::Solutions,
            Node::new(NodePayload::Solution {
                content: String::new(),
            }),
        )
    }

    pub fn add_impact(&mut self, problem_id: NodeId) -> Result<NodeId, SessionError> {
        self.append_child(
            problem_id,
            ContainerKind::Impacts,
            Node::new(NodePayload::Impact {
                content: String::new(),
            }),
        )
    }

    // ------------------------------------------------------------------
    // Removal
    // ------------------------------------------------------------------

    /// Removes one node after explicit confirmation, cascading to all
    /// descendants. Declining leaves all state unchanged. A node that is
    /// already gone is an absent view and a silent no-op.
    pub fn remove_node(&mut self, node_id: NodeId, choice: RemovalChoice) -> bool {
        if choice == RemovalChoice::Cancel {
            return false;
        }
        let Some(container) = self.document.parent_container_mut(node_id) else {
            return false;
        };
        if container.take(node_id).is_none() {
            return false;
        }
        container.reassign_sort_orders();
        self.run_directives(ActionKind::Remove);
        true
    }

    // ------------------------------------------------------------------
    // Skills
    // ------------------------------------------------------------------

    /// Adds one manually curated skill name and syncs immediately.
    ///
    /// Blank input is ignored. Returns whether the name was new.
    pub fn add_manual_skill(&mut self, name: &str) -> bool {
        if name.trim().is_empty() {
            return false;
        }
        let added = self.manual_skills.add(name);
        self.run_directives(ActionKind::AddManualSkill);
        added
    }

    // ------------------------------------------------------------------
    // Time and submission
    // ------------------------------------------------------------------

    /// Advances the logical clock, running sync cycles for every fired
    /// timer slot. Returns the number of cycles that completed (guarded
    /// cycles do not count and are not queued).
    pub fn advance(&mut self, delta_ms: u64) -> usize {
        let fired = self.timers.advance(delta_ms);
        let mut completed = 0;
        for _slot in fired {
            if self.sync_cycle() {
                completed += 1;
            }
        }
        completed
    }

    /// Runs one full sync cycle now, unless the ghost guard skips it.
    ///
    /// Cycle order: derive valid skills, prune stale assignments, rebuild
    /// the pool wholesale, re-stamp every path.
    pub fn sync_cycle(&mut self) -> bool {
        if self.dragging {
            debug!("event=sync_skip module=session status=guarded reason=drag_ghost");
            return false;
        }
        let valid = compute_valid_skills(&self.document, &self.manual_skills);
        let pruned = prune_stale_assignments(&mut self.document, &valid);
        let assigned = assigned_skill_names(&self.document);
        self.pool = rebuild_pool(&valid, &assigned);
        renumber::renumber(&mut self.document);
        debug!(
            "event=sync_cycle module=session status=ok valid={} assigned={} pool={} pruned={}",
            valid.len(),
            assigned.len(),
            self.pool.len(),
            pruned
        );
        true
    }

    /// Produces the flat submission form.
    ///
    /// Runs one final renumbering pass first so every index equals the live
    /// position, regardless of pending debounce windows.
    pub fn submit(&mut self) -> BTreeMap<String, String> {
        renumber::renumber(&mut self.document);
        let fields = form::flatten(&self.document);
        info!(
            "event=submit module=session status=ok fields={}",
            fields.len()
        );
        fields
    }

    // ------------------------------------------------------------------
    // Internal plumbing
    // ------------------------------------------------------------------

    fn run_directives(&mut self, action: ActionKind) {
        let directives: Vec<SyncDirective> = self.actions.directives(action).to_vec();
        for directive in directives {
            match directive {
                SyncDirective::RenumberNow => renumber::renumber(&mut self.document),
                SyncDirective::SyncNow => {
                    self.sync_cycle();
                }
                SyncDirective::SyncDebounced => {
                    self.timers
                        .schedule(TimerSlot::TextDebounce, TEXT_DEBOUNCE_MS);
                }
                SyncDirective::SyncAfterSettle => {
                    self.timers
                        .schedule(TimerSlot::MutationSettle, MUTATION_SETTLE_MS);
                }
            }
        }
    }

    fn append_root(&mut self, kind: ContainerKind, mut node: Node) -> NodeId {
        let node_id = node.node_id;
        if let Some(container) = self.document.root_mut(kind) {
            let index = renumber::next_safe_index(container);
            node.sort_order = index;
            stamp_provisional(&mut node, "", kind, index);
            container.push(node);
        }
        self.attach_for(node_id);
        self.run_directives(ActionKind::Add);
        node_id
    }

    fn append_child(
        &mut self,
        parent_id: NodeId,
        kind: ContainerKind,
        mut node: Node,
    ) -> Result<NodeId, SessionError> {
        let parent_prefix = self
            .document
            .find_node(parent_id)
            .ok_or(SessionError::NodeNotFound(parent_id))?
            .serial_prefix
            .clone();
        let container = self
            .document
            .find_node_mut(parent_id)
            .ok_or(SessionError::NodeNotFound(parent_id))?
            .container_mut(kind)
            .ok_or(SessionError::ContainerMissing {
                parent: parent_id,
                kind,
            })?;
        let index = renumber::next_safe_index(container);
        node.sort_order = index;
        stamp_provisional(&mut node, &parent_prefix, kind, index);
        let node_id = node.node_id;
        container.push(node);
        self.attach_for(node_id);
        self.run_directives(ActionKind::Add);
        Ok(node_id)
    }

    fn attach_tree(&mut self) {
        for kind in [
            ContainerKind::KeyRoles,
            ContainerKind::Companies,
            ContainerKind::Educations,
            ContainerKind::Certifications,
            ContainerKind::SkillCategories,
        ] {
            self.sortables
                .attach(ContainerAddr::Root(kind), SortableOptions::sortable(DRAG_HANDLE));
        }
        self.sortables.attach(
            ContainerAddr::SkillPool,
            SortableOptions::interchange("", false, SKILL_INTERCHANGE_GROUP),
        );

        let Self {
            document, sortables, ..
        } = self;
        for container in document.root_containers() {
            for node in &container.nodes {
                attach_node_containers(sortables, node);
            }
        }
    }

    fn attach_for(&mut self, node_id: NodeId) {
        let Self {
            document, sortables, ..
        } = self;
        if let Some(node) = document.find_node(node_id) {
            attach_node_containers(sortables, node);
        }
    }
}

/// Attaches drag behavior for every node-owned container in a subtree.
///
/// Re-walking already attached subtrees is safe: attachment is idempotent.
fn attach_node_containers(registry: &mut SortableRegistry, node: &Node) {
    for container in &node.children {
        if let Some(options) = options_for(container.kind) {
            registry.attach(
                ContainerAddr::Child {
                    parent: node.node_id,
                    kind: container.kind,
                },
                options,
            );
        }
        for child in &container.nodes {
            attach_node_containers(registry, child);
        }
    }
}

/// Drag configuration per node-owned container kind.
///
/// Problem lists are not drag-enabled; skill containers join the shared
/// interchange group with whole-item dragging.
fn options_for(kind: ContainerKind) -> Option<SortableOptions> {
    match kind {
        ContainerKind::Projects
        | ContainerKind::MetaItems
        | ContainerKind::TechStacks
        | ContainerKind::Solutions
        | ContainerKind::Impacts => Some(SortableOptions::sortable(DRAG_HANDLE)),
        ContainerKind::Skills => Some(SortableOptions::interchange(
            "",
            true,
            SKILL_INTERCHANGE_GROUP,
        )),
        _ => None,
    }
}

/// Stamps provisional path prefixes on a freshly built subtree so the
/// safe-index scan sees the new entries before the next renumbering pass.
fn stamp_provisional(node: &mut Node, parent_prefix: &str, kind: ContainerKind, index: i64) {
    node.serial_prefix = path_prefix(parent_prefix, kind, index);
    let prefix = node.serial_prefix.clone();
    for container in &mut node.children {
        let child_kind = container.kind;
        for (child_index, child) in container.nodes.iter_mut().enumerate() {
            stamp_provisional(child, &prefix, child_kind, child_index as i64);
        }
    }
}

fn project_scaffold(kind: CompanyKind) -> Node {
    let mut project = Node::new(NodePayload::Project {
        title: String::new(),
        kind,
    });

    let mut tech_group = meta_scaffold(MetaItemKind::TechStackGroup, 2);
    if let Some(tech_stacks) = tech_group.container_mut(ContainerKind::TechStacks) {
        tech_stacks.push(Node::new(NodePayload::TechStack {
            tech_name: String::new(),
        }));
    }
    let mut content_group = meta_scaffold(MetaItemKind::ContentGroup, 3);
    if let Some(problems) = content_group.container_mut(ContainerKind::Problems) {
        problems.push(problem_scaffold());
    }

    if let Some(meta_items) = project.container_mut(ContainerKind::MetaItems) {
        meta_items.push(meta_scaffold(MetaItemKind::Duration, 0));
        meta_items.push(meta_scaffold(MetaItemKind::Summary, 1));
        meta_items.push(tech_group);
        meta_items.push(content_group);
    }
    project
}

fn meta_scaffold(item_type: MetaItemKind, sort_order: i64) -> Node {
    let mut meta = Node::new(NodePayload::MetaItem {
        item_type,
        content: String::new(),
    });
    meta.sort_order = sort_order;
    meta
}

fn problem_scaffold() -> Node {
    let mut problem = Node::new(NodePayload::Problem {
        title: String::new(),
    });
    if let Some(solutions) = problem.container_mut(ContainerKind::Solutions) {
        solutions.push(Node::new(NodePayload::Solution {
            content: String::new(),
        }));
    }
    if let Some(impacts) = problem.container_mut(ContainerKind::Impacts) {
        impacts.push(Node::new(NodePayload::Impact {
            content: String::new(),
        }));
    }
    problem
}

#[cfg(test)]
mod tests {
    use super::{EditingSession, RemovalChoice};
    use crate::model::document::{ContainerKind, ProfileDocument};

    #[test]
    fn add_project_builds_the_standard_scaffold() {
        let mut session = EditingSession::new(ProfileDocument::new());
        let company = session.add_company();
        let project = session
            .add_project(company)
            .expect("company should accept a project");

        let doc = session.document();
        let node = doc.find_node(project).expect("project should exist");
        let meta_items = node
            .container(ContainerKind::MetaItems)
            .expect("project should own meta items");
        assert_eq!(meta_items.len(), 4);

        let tech_group = &meta_items.nodes[2];
        assert_eq!(
            tech_group
                .container(ContainerKind::TechStacks)
                .expect("tech group should own stacks")
                .len(),
            1
        );
        let content_group = &meta_items.nodes[3];
        let problems = content_group
            .container(ContainerKind::Problems)
            .expect("content group should own problems");
        assert_eq!(problems.len(), 1);
        assert_eq!(
            problems.nodes[0]
                .container(ContainerKind::Solutions)
                .expect("problem should own solutions")
                .len(),
            1
        );
    }

    #[test]
    fn declined_removal_changes_nothing() {
        let mut session = EditingSession::new(ProfileDocument::new());
        let company = session.add_company();
        let before = session.document().clone();

        assert!(!session.remove_node(company, RemovalChoice::Cancel));
        assert_eq!(session.document(), &before);
    }

    #[test]
    fn removing_missing_node_is_a_silent_no_op() {
        let mut session = EditingSession::new(ProfileDocument::new());
        let ghost = uuid::Uuid::new_v4();
        assert!(!session.remove_node(ghost, RemovalChoice::Confirm));
    }
}
