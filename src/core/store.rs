//! Secret version store.
//!
//! Remote, append-only history of ciphertext per (project, environment).
//! The store never sees plaintext and never decrypts.
//!
//! ## Adding a New Store
//!
//! 1. Implement the `VersionStore` trait
//! 2. Map "nothing stored yet" to `ApiError::NotFound` so callers can tell
//!    a first push apart from a real failure
//!
//! ## Example
//!
//! ```ignore
//! struct Bucket { /* ... */ }
//!
//! impl VersionStore for Bucket {
//!     fn push(&self, project_id: &str, environment: Environment, /* ... */) -> Result<Receipt> {
//!         // Append a new object, return its assigned version
//!     }
//!     // ...
//! }
//! ```

use crate::core::domain::{Environment, Format, Receipt, SecretVersion, VersionSummary};
use crate::core::types::Metadata;
use crate::error::Result;

/// Remote ciphertext history.
pub trait VersionStore {
    /// Append a new version and return the store-assigned receipt.
    ///
    /// # Errors
    ///
    /// `ApiError::Unauthorized` / `Forbidden` on auth failures. Nothing is
    /// stored on failure.
    fn push(
        &self,
        project_id: &str,
        environment: Environment,
        ciphertext: &[u8],
        format: Format,
        metadata: &Metadata,
    ) -> Result<Receipt>;

    /// Fetch the latest version.
    ///
    /// # Errors
    ///
    /// `ApiError::NotFound` if nothing has been pushed to `environment` yet.
    fn pull(&self, project_id: &str, environment: Environment) -> Result<SecretVersion>;

    /// Version history, newest first.
    fn list_versions(
        &self,
        project_id: &str,
        environment: Environment,
    ) -> Result<Vec<VersionSummary>>;

    /// Re-publish an earlier version's ciphertext as the new latest.
    ///
    /// History is kept; the result is a new, higher version.
    fn rollback(&self, project_id: &str, version_id: &str) -> Result<Receipt>;
}
