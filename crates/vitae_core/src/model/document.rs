//! Profile document tree and container addressing.
//!
//! # Responsibility
//! - Define the ordered container shape and the five root containers.
//! - Provide tree lookup by session-local node handle.
//!
//! # Invariants
//! - Child iteration order is edit order; there is no secondary sort key.
//! - Container kinds map 1:1 to path segments of the submission grammar.

use crate::model::node::{Node, NodeId, NodeRole};
use serde::{Deserialize, Serialize};

/// Kind of one ordered container, root-level or node-owned.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ContainerKind {
    KeyRoles,
    Companies,
    Educations,
    Certifications,
    SkillCategories,
    Projects,
    MetaItems,
    TechStacks,
    Problems,
    Solutions,
    Impacts,
    Skills,
}

impl ContainerKind {
    /// Returns the path segment this container contributes to field paths.
    pub fn segment(self) -> &'static str {
        match self {
            Self::KeyRoles => "keyRoles",
            Self::Companies => "companies",
            Self::Educations => "educations",
            Self::Certifications => "certifications",
            Self::SkillCategories => "skillCategories",
            Self::Projects => "projects",
            Self::MetaItems => "metaItems",
            Self::TechStacks => "techStacks",
            Self::Problems => "problems",
            Self::Solutions => "solutions",
            Self::Impacts => "impacts",
            Self::Skills => "skills",
        }
    }

    /// Returns the role of nodes held by containers of this kind.
    pub fn child_role(self) -> NodeRole {
        match self {
            Self::KeyRoles => NodeRole::KeyRole,
            Self::Companies => NodeRole::Company,
            Self::Educations => NodeRole::Education,
            Self::Certifications => NodeRole::Certification,
            Self::SkillCategories => NodeRole::SkillCategory,
            Self::Projects => NodeRole::Project,
            Self::MetaItems => NodeRole::MetaItem,
            Self::TechStacks => NodeRole::TechStack,
            Self::Problems => NodeRole::Problem,
            Self::Solutions => NodeRole::Solution,
            Self::Impacts => NodeRole::Impact,
            Self::Skills => NodeRole::Skill,
        }
    }

    /// Returns whether containers of this kind live at the document root.
    pub fn is_root(self) -> bool {
        matches!(
            self,
            Self::KeyRoles
                | Self::Companies
                | Self::Educations
                | Self::Certifications
                | Self::SkillCategories
        )
    }
}

/// Address of one container inside a session.
///
/// The skill pool is session-owned and holds identity-less chips, so it is
/// addressed as its own variant rather than through the document tree.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum ContainerAddr {
    /// One of the five document-root containers.
    Root(ContainerKind),
    /// Container owned by one node, e.g. a project's meta items.
    Child { parent: NodeId, kind: ContainerKind },
    /// The derived detected-skill pool.
    SkillPool,
}

/// Ordered sequence of same-role nodes under one parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Container {
    /// Kind deciding path segment and child role.
    pub kind: ContainerKind,
    /// Children in edit order.
    pub nodes: Vec<Node>,
}

impl Container {
    /// Creates an empty container of the given kind.
    pub fn new(kind: ContainerKind) -> Self {
        Self {
            kind,
            nodes: Vec::new(),
        }
    }

    /// Returns the number of children.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns whether the container has no children.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the position of one child by handle.
    pub fn position_of(&self, node_id: NodeId) -> Option<usize> {
        self.nodes.iter().position(|node| node.node_id == node_id)
    }

    /// Removes and returns one child by handle.
    ///
    /// Removal cascades: the returned node still owns its sub-containers.
    pub fn take(&mut self, node_id: NodeId) -> Option<Node> {
        let index = self.position_of(node_id)?;
        Some(self.nodes.remove(index))
    }

    /// Inserts one child at a clamped position.
    pub fn insert(&mut self, index: usize, node: Node) {
        let index = index.min(self.nodes.len());
        self.nodes.insert(index, node);
    }

    /// Appends one child at the end.
    pub fn push(&mut self, node: Node) {
        self.nodes.push(node);
    }

    /// Rewrites `sort_order` to the current 0-based position for every child.
    pub fn reassign_sort_orders(&mut self) {
        for (index, node) in self.nodes.iter_mut().enumerate() {
            node.sort_order = index as i64;
        }
    }
}

/// In-session representation of the whole editable profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileDocument {
    pub key_roles: Container,
    pub companies: Container,
    pub educations: Container,
    pub certifications: Container,
    pub skill_categories: Container,
}

impl Default for ProfileDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileDocument {
    /// Creates an empty document with all five root containers.
    pub fn new() -> Self {
        Self {
            key_roles: Container::new(ContainerKind::KeyRoles),
            companies: Container::new(ContainerKind::Companies),
            educations: Container::new(ContainerKind::Educations),
            certifications: Container::new(ContainerKind::Certifications),
            skill_categories: Container::new(ContainerKind::SkillCategories),
        }
    }

    /// Returns the root containers in submission order.
    pub fn root_containers(&self) -> [&Container; 5] {
        [
            &self.key_roles,
            &self.companies,
            &self.educations,
            &self.certifications,
            &self.skill_categories,
        ]
    }

    /// Mutable variant of [`ProfileDocument::root_containers`].
    pub fn root_containers_mut(&mut self) -> [&mut Container; 5] {
        [
            &mut self.key_roles,
            &mut self.companies,
            &mut self.educations,
            &mut self.certifications,
            &mut self.skill_categories,
        ]
    }

    /// Returns one root container by kind.
    pub fn root(&self, kind: ContainerKind) -> Option<&Container> {
        self.root_containers()
            .into_iter()
            .find(|container| container.kind == kind)
    }

    /// Mutable variant of [`ProfileDocument::root`].
    pub fn root_mut(&mut self, kind: ContainerKind) -> Option<&mut Container> {
        self.root_containers_mut()
            .into_iter()
            .find(|container| container.kind == kind)
    }

    /// Finds one node anywhere in the tree by handle.
    pub fn find_node(&self, node_id: NodeId) -> Option<&Node> {
        self.root_containers()
            .into_iter()
            .find_map(|container| find_in_container(container, node_id))
    }

    /// Mutable variant of [`ProfileDocument::find_node`].
    pub fn find_node_mut(&mut self, node_id: NodeId) -> Option<&mut Node> {
        self.root_containers_mut()
            .into_iter()
            .find_map(|container| find_in_container_mut(container, node_id))
    }

    /// Resolves a tree container address.
    ///
    /// Returns `None` for `SkillPool` (session-owned) and for missing views,
    /// which callers treat as an absent optional view.
    pub fn container_mut(&mut self, addr: ContainerAddr) -> Option<&mut Container> {
        match addr {
            ContainerAddr::Root(kind) => self.root_mut(kind),
            ContainerAddr::Child { parent, kind } => {
                self.find_node_mut(parent)?.container_mut(kind)
            }
            ContainerAddr::SkillPool => None,
        }
    }

    /// Finds the container currently holding one node.
    pub fn parent_container_mut(&mut self, node_id: NodeId) -> Option<&mut Container> {
        self.root_containers_mut()
            .into_iter()
            .find_map(|container| holding_container_mut(container, node_id))
    }
}

fn find_in_container(container: &Container, node_id: NodeId) -> Option<&Node> {
    for node in &container.nodes {
        if node.node_id == node_id {
            return Some(node);
        }
        for child in &node.children {
            if let Some(found) = find_in_container(child, node_id) {
                return Some(found);
            }
        }
    }
    None
}

fn find_in_container_mut(container: &mut Container, node_id: NodeId) -> Option<&mut Node> {
    for node in &mut container.nodes {
        if node.node_id == node_id {
            return Some(node);
        }
        for child in &mut node.children {
            if let Some(found) = find_in_container_mut(child, node_id) {
                return Some(found);
            }
        }
    }
    None
}

fn holding_container_mut(container: &mut Container, node_id: NodeId) -> Option<&mut Container> {
    if container.position_of(node_id).is_some() {
        return Some(container);
    }
    for node in &mut container.nodes {
        for child in &mut node.children {
            if let Some(found) = holding_container_mut(child, node_id) {
                return Some(found);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::{Container, ContainerAddr, ContainerKind, ProfileDocument};
    use crate::model::node::{CompanyKind, Node, NodePayload};

    fn company(name: &str) -> Node {
        Node::new(NodePayload::Company {
            name: name.to_string(),
            kind: CompanyKind::Work,
        })
    }

    #[test]
    fn find_node_reaches_nested_children() {
        let mut doc = ProfileDocument::new();
        let mut parent = company("Acme");
        let project = Node::new(NodePayload::Project {
            title: "Gateway".to_string(),
            kind: CompanyKind::Work,
        });
        let project_id = project.node_id;
        parent
            .container_mut(ContainerKind::Projects)
            .expect("company should own projects")
            .push(project);
        doc.companies.push(parent);

        assert!(doc.find_node(project_id).is_some());
        let holder = doc
            .parent_container_mut(project_id)
            .expect("project should have a holding container");
        assert_eq!(holder.kind, ContainerKind::Projects);
    }

    #[test]
    fn container_mut_treats_pool_and_missing_views_as_absent() {
        let mut doc = ProfileDocument::new();
        assert!(doc.container_mut(ContainerAddr::SkillPool).is_none());
        let ghost = uuid::Uuid::new_v4();
        assert!(doc
            .container_mut(ContainerAddr::Child {
                parent: ghost,
                kind: ContainerKind::Skills,
            })
            .is_none());
    }

    #[test]
    fn reassign_sort_orders_is_contiguous() {
        let mut container = Container::new(ContainerKind::Companies);
        container.push(company("A"));
        container.push(company("B"));
        container.push(company("C"));
        container.nodes.swap(0, 2);
        container.reassign_sort_orders();
        let orders: Vec<i64> = container.nodes.iter().map(|n| n.sort_order).collect();
        assert_eq!(orders, vec![0, 1, 2]);
    }
}
