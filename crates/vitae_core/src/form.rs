//! Submission-form serialization boundary.
//!
//! # Responsibility
//! - Flatten the document tree into field-path → value pairs using the
//!   `role[index].field` grammar.
//! - Emit every payload slot by stable semantic field name.
//!
//! # Invariants
//! - Paths are read from the stamped prefixes; callers run a renumbering
//!   pass immediately before flattening so every index equals the live
//!   position.
//! - `id`/`version` are emitted only when non-empty; a new entry posts no
//!   identity.

use crate::model::document::{Container, ProfileDocument};
use crate::model::node::{MetaItemKind, Node, NodePayload};
use std::collections::BTreeMap;

/// Flattens the whole document into submission fields.
pub fn flatten(document: &ProfileDocument) -> BTreeMap<String, String> {
    let mut fields = BTreeMap::new();
    for container in document.root_containers() {
        flatten_container(container, &mut fields);
    }
    fields
}

fn flatten_container(container: &Container, fields: &mut BTreeMap<String, String>) {
    for node in &container.nodes {
        flatten_node(node, fields);
        for child in &node.children {
            flatten_container(child, fields);
        }
    }
}

fn flatten_node(node: &Node, fields: &mut BTreeMap<String, String>) {
    let prefix = node.serial_prefix.as_str();
    let mut put = |field: &str, value: String| {
        fields.insert(format!("{prefix}.{field}"), value);
    };

    put("sortOrder", node.sort_order.to_string());
    put("visible", node.visible.to_string());
    if !node.id.is_empty() {
        put("id", node.id.clone());
    }
    if !node.version.is_empty() {
        put("version", node.version.clone());
    }

    match &node.payload {
        NodePayload::Company { name, kind } => {
            put("name", name.clone());
            put("type", kind.as_str().to_string());
        }
        NodePayload::Project { title, kind } => {
            put("title", title.clone());
            put("type", kind.as_str().to_string());
        }
        NodePayload::MetaItem { item_type, content } => {
            put("itemType", item_type.as_str().to_string());
            // Group-type meta items carry their data in child containers,
            // not in a content field.
            if matches!(item_type, MetaItemKind::Duration | MetaItemKind::Summary) {
                put("content", content.clone());
            }
        }
        NodePayload::TechStack { tech_name } => put("techName", tech_name.clone()),
        NodePayload::Problem { title } => put("title", title.clone()),
        NodePayload::Solution { content } | NodePayload::Impact { content } => {
            put("content", content.clone());
        }
        NodePayload::KeyRole { role_content } => put("roleContent", role_content.clone()),
        NodePayload::Education {
            institution,
            major,
            gpa,
            period,
            additional_info,
        } => {
            put("institution", institution.clone());
            put("major", major.clone());
            put("gpa", gpa.clone());
            put("period", period.clone());
            put("additionalInfo", additional_info.clone());
        }
        NodePayload::Certification {
            name,
            issue_date,
            additional_info,
        } => {
            put("name", name.clone());
            put("issueDate", issue_date.clone());
            put("additionalInfo", additional_info.clone());
        }
        NodePayload::SkillCategory { name } | NodePayload::Skill { name } => {
            put("name", name.clone());
        }
    }
}
