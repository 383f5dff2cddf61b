//! Stored ciphertext versions.

use serde::{Deserialize, Serialize};

use crate::core::domain::{Environment, Format};
use crate::core::types::{Metadata, VersionId};

/// One immutable ciphertext version, as returned by a pull.
#[derive(Debug, Clone)]
pub struct SecretVersion {
    pub version_id: VersionId,
    pub environment: Environment,
    /// Monotonic per (project, environment), starting at 1.
    pub version: u32,
    pub format: Format,
    pub ciphertext: Vec<u8>,
    pub metadata: Metadata,
    pub size_bytes: u64,
    pub created_by: String,
    pub created_at: String,
}

/// Version history entry, without ciphertext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionSummary {
    pub version_id: VersionId,
    pub version: u32,
    pub environment: Environment,
    #[serde(default)]
    pub size_bytes: u64,
    #[serde(default)]
    pub created_by: String,
    #[serde(default)]
    pub created_at: String,
}

/// What the store hands back after a push or rollback.
///
/// The version number is authoritative; the client never predicts it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub version_id: VersionId,
    pub version: u32,
    pub environment: Environment,
    #[serde(default)]
    pub size_bytes: u64,
}

impl SecretVersion {
    pub fn summary(&self) -> VersionSummary {
        VersionSummary {
            version_id: self.version_id.clone(),
            version: self.version,
            environment: self.environment,
            size_bytes: self.size_bytes,
            created_by: self.created_by.clone(),
            created_at: self.created_at.clone(),
        }
    }
}
