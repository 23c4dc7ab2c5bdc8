//! Path renumbering engine.
//!
//! # Responsibility
//! - Re-derive every node's serialization path prefix from its live
//!   structural position.
//! - Provide the safe-index scan used when appending new nodes.
//!
//! # Invariants
//! - Renumbering is a pure re-labeling pass: node count, order, and payload
//!   values are never changed.
//! - A second pass with no intervening structural change yields
//!   byte-identical prefixes.
//! - The pass is total: server-loaded and freshly created nodes are stamped
//!   alike, keyed by the node itself rather than any prior path text.

use crate::model::document::{Container, ContainerKind, ProfileDocument};
use once_cell::sync::Lazy;
use regex::Regex;

/// Matches the trailing bracketed index of a stamped path prefix.
static INDEX_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[(\d+)\]$").expect("index suffix pattern is valid"));

/// Builds the path prefix for a child at `index` of a container.
///
/// Root-level: `companies[0]`. Nested: `companies[0].projects[2]`.
pub fn path_prefix(parent_prefix: &str, kind: ContainerKind, index: i64) -> String {
    if parent_prefix.is_empty() {
        format!("{}[{index}]", kind.segment())
    } else {
        format!("{parent_prefix}.{}[{index}]", kind.segment())
    }
}

/// Re-stamps every node's path prefix across the whole document.
pub fn renumber(document: &mut ProfileDocument) {
    for container in document.root_containers_mut() {
        renumber_container(container, "");
    }
}

fn renumber_container(container: &mut Container, parent_prefix: &str) {
    let kind = container.kind;
    for (index, node) in container.nodes.iter_mut().enumerate() {
        node.serial_prefix = path_prefix(parent_prefix, kind, index as i64);
        let prefix = node.serial_prefix.clone();
        for child in &mut node.children {
            renumber_container(child, &prefix);
        }
    }
}

/// Returns the next safe append index for one container.
///
/// Scans the trailing bracketed index of every child's stamped prefix,
/// covering both server-loaded and freshly created entries. Entries whose
/// prefix carries no parseable index are skipped rather than treated as
/// fatal; the maximum is computed from the remaining valid ones.
pub fn next_safe_index(container: &Container) -> i64 {
    let mut max = -1i64;
    for node in &container.nodes {
        let Some(captures) = INDEX_SUFFIX.captures(&node.serial_prefix) else {
            continue;
        };
        let Ok(index) = captures[1].parse::<i64>() else {
            continue;
        };
        if index > max {
            max = index;
        }
    }
    max + 1
}
