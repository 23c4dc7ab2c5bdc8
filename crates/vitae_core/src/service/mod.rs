//! Synchronization engine services.
//!
//! # Responsibility
//! - Orchestrate reorder, renumbering, and skill-pool recomputation above
//!   the document model.
//! - Keep UI/driver layers decoupled from tree bookkeeping details.

pub mod renumber;
pub mod reorder;
pub mod session;
pub mod skill_sync;
pub mod transfer;
