//! Contact reveal boundary.
//!
//! # Responsibility
//! - Define the read-endpoint contract the surrounding UI consumes.
//! - Keep the synchronization engine free of any network coupling.
//!
//! # Invariants
//! - "Both fields absent" is a successful outcome, distinct from transport
//!   failure.
//! - Calls are fire-and-forget request/response; nothing here is retried.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Response payload of the contact reveal endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl ContactInfo {
    /// Returns whether at least one non-blank contact field is present.
    pub fn has_any(&self) -> bool {
        let filled = |value: &Option<String>| {
            value
                .as_deref()
                .map(|text| !text.trim().is_empty())
                .unwrap_or(false)
        };
        filled(&self.phone) || filled(&self.email)
    }
}

/// Transport-level failure of the reveal call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactRevealError {
    /// Request did not complete or returned a non-OK status.
    Network(String),
}

impl Display for ContactRevealError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Network(message) => write!(f, "contact reveal failed: {message}"),
        }
    }
}

impl Error for ContactRevealError {}

/// Read-endpoint contract for revealing contact details by profile id.
pub trait ContactDirectory {
    /// Returns contact details for one profile.
    ///
    /// An `Ok` with both fields absent means the profile has no registered
    /// contact information; an `Err` means the call itself failed.
    fn reveal(&self, profile_id: i64) -> Result<ContactInfo, ContactRevealError>;
}
