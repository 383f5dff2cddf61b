//! Recipient directory.
//!
//! Authoritative membership of a project. Every encryption asks it for the
//! current members instead of trusting a local cache, so a removed member is
//! never re-added as a recipient.

use crate::core::domain::Recipient;
use crate::error::Result;

/// Source of the current recipients of a project.
pub trait RecipientDirectory {
    /// Every member with access to `project_id`, including members that
    /// have not registered a public key yet.
    ///
    /// # Errors
    ///
    /// `ApiError::Unauthorized` / `Forbidden` / `NotFound` from the remote.
    fn list_recipients(&self, project_id: &str) -> Result<Vec<Recipient>>;
}
