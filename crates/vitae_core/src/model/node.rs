//! Node domain model.
//!
//! # Responsibility
//! - Define the tagged node-role union with a fixed payload shape per role.
//! - Provide constructors for client-created and server-loaded nodes.
//!
//! # Invariants
//! - `node_id` is stable for the session and never serialized to the form.
//! - `id`/`version` are the persisted identity pair; empty string means the
//!   node is new or has just been transferred across categories.
//! - The set of owned child containers is fixed by the role at construction.

use crate::model::document::{Container, ContainerKind};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Session-local handle for one tree node.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type NodeId = Uuid;

/// Role of a node inside the profile tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeRole {
    Company,
    Project,
    MetaItem,
    TechStack,
    Problem,
    Solution,
    Impact,
    KeyRole,
    Education,
    Certification,
    SkillCategory,
    Skill,
}

/// Company/project classification submitted as the `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompanyKind {
    Work,
    Personal,
}

impl CompanyKind {
    /// Returns the wire value used on the submission form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Work => "WORK",
            Self::Personal => "PERSONAL",
        }
    }
}

/// Meta-item group discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MetaItemKind {
    Duration,
    Summary,
    TechStackGroup,
    ContentGroup,
}

impl MetaItemKind {
    /// Returns the wire value used on the submission form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Duration => "DURATION",
            Self::Summary => "SUMMARY",
            Self::TechStackGroup => "TECH_STACK_GROUP",
            Self::ContentGroup => "CONTENT_GROUP",
        }
    }
}

/// Role-specific payload, one fixed shape per role.
///
/// The editor never probes for alternative field holders at read time; the
/// old-vs-new representation question is settled here, once, at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum NodePayload {
    Company {
        name: String,
        kind: CompanyKind,
    },
    Project {
        title: String,
        kind: CompanyKind,
    },
    MetaItem {
        item_type: MetaItemKind,
        content: String,
    },
    TechStack {
        tech_name: String,
    },
    Problem {
        title: String,
    },
    Solution {
        content: String,
    },
    Impact {
        content: String,
    },
    KeyRole {
        role_content: String,
    },
    Education {
        institution: String,
        major: String,
        gpa: String,
        period: String,
        additional_info: String,
    },
    Certification {
        name: String,
        issue_date: String,
        additional_info: String,
    },
    SkillCategory {
        name: String,
    },
    Skill {
        name: String,
    },
}

impl NodePayload {
    /// Returns the role tag for this payload.
    pub fn role(&self) -> NodeRole {
        match self {
            Self::Company { .. } => NodeRole::Company,
            Self::Project { .. } => NodeRole::Project,
            Self::MetaItem { .. } => NodeRole::MetaItem,
            Self::TechStack { .. } => NodeRole::TechStack,
            Self::Problem { .. } => NodeRole::Problem,
            Self::Solution { .. } => NodeRole::Solution,
            Self::Impact { .. } => NodeRole::Impact,
            Self::KeyRole { .. } => NodeRole::KeyRole,
            Self::Education { .. } => NodeRole::Education,
            Self::Certification { .. } => NodeRole::Certification,
            Self::SkillCategory { .. } => NodeRole::SkillCategory,
            Self::Skill { .. } => NodeRole::Skill,
        }
    }
}

/// Semantic key for one free-text slot on a node payload.
///
/// Text edits address slots by this key, never by any prior path string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextField {
    Name,
    Title,
    Content,
    TechName,
    RoleContent,
    Institution,
    Major,
    Gpa,
    Period,
    AdditionalInfo,
    IssueDate,
}

/// Single tree item with identity, order, visibility, and payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Session-local stable handle. Not part of the submitted form.
    pub node_id: NodeId,
    /// Persisted identity; empty string when the node is new.
    pub id: String,
    /// Optimistic-concurrency token; empty when new or just transferred.
    pub version: String,
    /// Always equal to the 0-based position in the parent container.
    pub sort_order: i64,
    /// Own visibility flag; effective visibility also requires every
    /// visibility-gated ancestor to be visible.
    pub visible: bool,
    /// Role-specific fields.
    pub payload: NodePayload,
    /// Stamped path prefix, e.g. `companies[0].projects[2]`.
    ///
    /// Provisional after an add; guaranteed correct only by a renumbering
    /// pass.
    pub serial_prefix: String,
    /// Owned child containers, fixed per role.
    pub children: Vec<Container>,
}

impl Node {
    /// Creates a client-side node with a fresh handle and empty identity.
    pub fn new(payload: NodePayload) -> Self {
        let children = child_containers(payload.role());
        Self {
            node_id: Uuid::new_v4(),
            id: String::new(),
            version: String::new(),
            sort_order: 0,
            visible: true,
            payload,
            serial_prefix: String::new(),
            children,
        }
    }

    /// Creates a node carrying server-assigned identity.
    ///
    /// Used when loading an already persisted document into a session.
    pub fn with_identity(
        id: impl Into<String>,
        version: impl Into<String>,
        payload: NodePayload,
    ) -> Self {
        let mut node = Self::new(payload);
        node.id = id.into();
        node.version = version.into();
        node
    }

    /// Returns the role of this node.
    pub fn role(&self) -> NodeRole {
        self.payload.role()
    }

    /// Returns the owned child container of the given kind, if the role has
    /// one.
    pub fn container(&self, kind: ContainerKind) -> Option<&Container> {
        self.children.iter().find(|container| container.kind == kind)
    }

    /// Mutable variant of [`Node::container`].
    pub fn container_mut(&mut self, kind: ContainerKind) -> Option<&mut Container> {
        self.children
            .iter_mut()
            .find(|container| container.kind == kind)
    }

    /// Writes one free-text slot addressed by semantic key.
    ///
    /// Returns `false` when the role has no such slot; the caller decides
    /// whether that is a defect.
    pub fn set_text(&mut self, field: TextField, value: impl Into<String>) -> bool {
        let value = value.into();
        match (&mut self.payload, field) {
            (NodePayload::Company { name, .. }, TextField::Name)
            | (NodePayload::Certification { name, .. }, TextField::Name)
            | (NodePayload::SkillCategory { name }, TextField::Name)
            | (NodePayload::Skill { name }, TextField::Name) => *name = value,
            (NodePayload::Project { title, .. }, TextField::Title)
            | (NodePayload::Problem { title }, TextField::Title) => *title = value,
            (NodePayload::MetaItem { content, .. }, TextField::Content)
            | (NodePayload::Solution { content }, TextField::Content)
            | (NodePayload::Impact { content }, TextField::Content) => *content = value,
            (NodePayload::TechStack { tech_name }, TextField::TechName) => *tech_name = value,
            (NodePayload::KeyRole { role_content }, TextField::RoleContent) => {
                *role_content = value;
            }
            (NodePayload::Education { institution, .. }, TextField::Institution) => {
                *institution = value;
            }
            (NodePayload::Education { major, .. }, TextField::Major) => *major = value,
            (NodePayload::Education { gpa, .. }, TextField::Gpa) => *gpa = value,
            (NodePayload::Education { period, .. }, TextField::Period) => *period = value,
            (NodePayload::Education { additional_info, .. }, TextField::AdditionalInfo)
            | (NodePayload::Certification { additional_info, .. }, TextField::AdditionalInfo) => {
                *additional_info = value;
            }
            (NodePayload::Certification { issue_date, .. }, TextField::IssueDate) => {
                *issue_date = value;
            }
            _ => return false,
        }
        true
    }
}

/// Returns the fixed child-container set for one role.
fn child_containers(role: NodeRole) -> Vec<Container> {
    match role {
        NodeRole::Company => vec![Container::new(ContainerKind::Projects)],
        NodeRole::Project => vec![Container::new(ContainerKind::MetaItems)],
        NodeRole::MetaItem => vec![
            Container::new(ContainerKind::TechStacks),
            Container::new(ContainerKind::Problems),
        ],
        NodeRole::Problem => vec![
            Container::new(ContainerKind::Solutions),
            Container::new(ContainerKind::Impacts),
        ],
        NodeRole::SkillCategory => vec![Container::new(ContainerKind::Skills)],
        NodeRole::TechStack
        | NodeRole::Solution
        | NodeRole::Impact
        | NodeRole::KeyRole
        | NodeRole::Education
        | NodeRole::Certification
        | NodeRole::Skill => Vec::new(),
    }
}
