//! Skill transfer and materialization protocol.
//!
//! # Responsibility
//! - Turn identity-less detected chips into full assigned entries on drop.
//! - Reset persisted identity when an entry changes category.
//!
//! # Invariants
//! - A materialized entry starts with empty `id`/`version`, `visible=true`,
//!   and a provisional `sort_order` pending renumbering.
//! - Persisted identity is scoped to one (category, position) pair; carrying
//!   it across a category change would let the persistence layer overwrite
//!   an unrelated record.

use crate::model::node::{Node, NodePayload};

/// Materializes a detected chip into an assigned skill entry.
pub fn materialize_chip(name: impl Into<String>) -> Node {
    Node::new(NodePayload::Skill { name: name.into() })
}

/// Clears persisted identity on a cross-category move.
pub fn reset_identity(node: &mut Node) {
    node.id.clear();
    node.version.clear();
}

#[cfg(test)]
mod tests {
    use super::{materialize_chip, reset_identity};
    use crate::model::node::{NodePayload, NodeRole};

    #[test]
    fn materialized_chip_carries_name_and_no_identity() {
        let node = materialize_chip("Kotlin");
        assert_eq!(node.role(), NodeRole::Skill);
        assert!(node.id.is_empty());
        assert!(node.version.is_empty());
        assert!(node.visible);
        assert!(matches!(
            &node.payload,
            NodePayload::Skill { name } if name == "Kotlin"
        ));
    }

    #[test]
    fn reset_identity_clears_both_tokens() {
        let mut node = materialize_chip("Go");
        node.id = "41".to_string();
        node.version = "7".to_string();
        reset_identity(&mut node);
        assert!(node.id.is_empty());
        assert!(node.version.is_empty());
    }
}
