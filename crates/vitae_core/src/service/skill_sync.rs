//! Skill derivation and pool synchronization.
//!
//! # Responsibility
//! - Derive the valid-skill set from effectively visible tech stacks plus
//!   the manual set.
//! - Prune stale category assignments and rebuild the detected pool
//!   wholesale.
//!
//! # Invariants
//! - Pool ∩ (union of all category skill containers) = ∅ after a completed
//!   cycle.
//! - Manual names are unconditional: they stay valid with no backing tech
//!   stack and regardless of any visibility flag.
//! - An invisible ancestor hides every descendant from detection, whatever
//!   the descendant's own flag says.

use crate::model::document::{ContainerKind, ProfileDocument};
use crate::model::node::{MetaItemKind, Node, NodePayload};
use log::info;
use serde::{Deserialize, Serialize};

/// Insertion-ordered set of names the user added by hand.
///
/// Owned by the editing session; membership does not depend on any tech
/// stack's existence or visibility.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualSkillSet {
    names: Vec<String>,
}

impl ManualSkillSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one trimmed name; blank input and duplicates are rejected.
    pub fn add(&mut self, name: &str) -> bool {
        let trimmed = name.trim();
        if trimmed.is_empty() || self.contains(trimmed) {
            return false;
        }
        self.names.push(trimmed.to_string());
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|entry| entry == name)
    }

    /// Returns names in insertion order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Computes the valid-skill catalog in scan order.
///
/// Walks Company → Project → MetaItem(TECH_STACK_GROUP) → TechStack under
/// effective visibility, keeping trimmed non-empty names, then appends the
/// manual set.
pub fn compute_valid_skills(document: &ProfileDocument, manual: &ManualSkillSet) -> Vec<String> {
    let mut valid: Vec<String> = Vec::new();
    for company in &document.companies.nodes {
        if !company.visible {
            continue;
        }
        let Some(projects) = company.container(ContainerKind::Projects) else {
            continue;
        };
        for project in &projects.nodes {
            if !project.visible {
                continue;
            }
            let Some(meta_items) = project.container(ContainerKind::MetaItems) else {
                continue;
            };
            for meta in &meta_items.nodes {
                if !meta.visible || !is_tech_stack_group(meta) {
                    continue;
                }
                let Some(tech_stacks) = meta.container(ContainerKind::TechStacks) else {
                    continue;
                };
                for tech in &tech_stacks.nodes {
                    if !tech.visible {
                        continue;
                    }
                    let NodePayload::TechStack { tech_name } = &tech.payload else {
                        continue;
                    };
                    let trimmed = tech_name.trim();
                    if !trimmed.is_empty() && !valid.iter().any(|entry| entry == trimmed) {
                        valid.push(trimmed.to_string());
                    }
                }
            }
        }
    }
    for name in manual.names() {
        if !valid.iter().any(|entry| entry == name) {
            valid.push(name.clone());
        }
    }
    valid
}

/// Returns every name currently assigned in any category, in document order.
pub fn assigned_skill_names(document: &ProfileDocument) -> Vec<String> {
    let mut assigned = Vec::new();
    for category in &document.skill_categories.nodes {
        let Some(skills) = category.container(ContainerKind::Skills) else {
            continue;
        };
        for skill in &skills.nodes {
            if let NodePayload::Skill { name } = &skill.payload {
                assigned.push(name.clone());
            }
        }
    }
    assigned
}

/// Removes assigned entries whose name left the valid set.
///
/// The removal is destructive: an entry whose only source was a now
/// invisible or deleted tech stack, and which was never added manually,
/// disappears from the document outright. Returns the removed count.
pub fn prune_stale_assignments(document: &mut ProfileDocument, valid: &[String]) -> usize {
    let mut removed = 0;
    for category in &mut document.skill_categories.nodes {
        let Some(skills) = category.container_mut(ContainerKind::Skills) else {
            continue;
        };
        let before = skills.len();
        skills.nodes.retain(|skill| match &skill.payload {
            NodePayload::Skill { name } => valid.iter().any(|entry| entry == name),
            _ => true,
        });
        let pruned_here = before - skills.len();
        if pruned_here > 0 {
            skills.reassign_sort_orders();
            removed += pruned_here;
        }
    }
    if removed > 0 {
        info!("event=skill_prune module=skill_sync status=ok removed={removed}");
    }
    removed
}

/// Rebuilds the pool wholesale: valid names minus assigned names.
pub fn rebuild_pool(valid: &[String], assigned: &[String]) -> Vec<String> {
    valid
        .iter()
        .filter(|name| !assigned.iter().any(|entry| entry == *name))
        .cloned()
        .collect()
}

fn is_tech_stack_group(meta: &Node) -> bool {
    matches!(
        &meta.payload,
        NodePayload::MetaItem {
            item_type: MetaItemKind::TechStackGroup,
            ..
        }
    )
}
