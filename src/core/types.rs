//! Type aliases for domain concepts.
//!
//! Provides semantic type aliases to make function signatures more descriptive.

/// Remote project identifier.
pub type ProjectId = String;

/// Remote organization identifier.
pub type OrganizationId = String;

/// Remote identifier of one stored secret version.
pub type VersionId = String;

/// An age public key string (starts with "age1...").
pub type PublicKey = String;

/// Opaque, self-describing engine metadata passed through to the store.
pub type Metadata = serde_json::Map<String, serde_json::Value>;
