//! Profile document model for the editing engine.
//!
//! # Responsibility
//! - Define the canonical node/container tree edited in a session.
//! - Keep one fixed payload shape per node role, resolved at construction.
//!
//! # Invariants
//! - Every node is identified by a stable session-local `NodeId`.
//! - A container holds same-role siblings in edit order; `sort_order`
//!   mirrors the 0-based position after every structural mutation.

pub mod document;
pub mod node;
