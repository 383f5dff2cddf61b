//! Wire types for the remote service.
//!
//! Field names follow the service's JSON. Optional fields default so that
//! older servers omitting them still decode.

use serde::{Deserialize, Serialize};

use crate::core::domain::{Access, Permission, Recipient, Role};
use crate::core::types::{Metadata, OrganizationId, ProjectId, PublicKey, VersionId};

/// Error body returned with any non-2xx status.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub details: Option<serde_json::Value>,
}

// --- auth ---

#[derive(Debug, Serialize)]
pub struct RegisterRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub name: &'a str,
    pub age_public_key: &'a str,
}

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub age_public_key: Option<PublicKey>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub access_token: String,
    pub user: User,
    #[serde(default)]
    pub expires_at: String,
}

// --- organizations ---

#[derive(Debug, Serialize)]
pub struct CreateOrganizationRequest<'a> {
    pub name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Organization {
    pub id: OrganizationId,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub member_count: u32,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Serialize)]
pub struct InviteRequest<'a> {
    pub email: &'a str,
    pub role: Role,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrganizationMember {
    #[serde(default)]
    pub user_id: String,
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub age_public_key: Option<PublicKey>,
    pub role: Role,
}

impl From<OrganizationMember> for Recipient {
    fn from(m: OrganizationMember) -> Self {
        Recipient::new(m.email, m.age_public_key, Access::Role(m.role)).with_name(m.name)
    }
}

// --- projects ---

#[derive(Debug, Serialize)]
pub struct CreateProjectRequest<'a> {
    pub name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    pub organization_id: OrganizationId,
    /// Set by the server after a membership change.
    #[serde(default)]
    pub needs_reencryption: bool,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectMember {
    #[serde(default)]
    pub user_id: String,
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub age_public_key: Option<PublicKey>,
    pub permission: Permission,
}

impl From<ProjectMember> for Recipient {
    fn from(m: ProjectMember) -> Self {
        Recipient::new(m.email, m.age_public_key, Access::Permission(m.permission))
            .with_name(m.name)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectMembers {
    #[serde(default)]
    pub project_id: ProjectId,
    #[serde(default)]
    pub members: Vec<ProjectMember>,
    #[serde(default)]
    pub total: u32,
}

#[derive(Debug, Serialize)]
pub struct GrantRequest<'a> {
    pub email: &'a str,
    pub permission: Permission,
}

// --- secrets ---

#[derive(Debug, Serialize)]
pub struct PushRequest<'a> {
    pub encrypted_data: &'a str,
    pub format: &'a str,
    pub environment: &'a str,
    pub metadata: &'a Metadata,
}

/// Push and rollback response.
#[derive(Debug, Clone, Deserialize)]
pub struct PushResponse {
    #[serde(default)]
    pub message: String,
    pub version_id: VersionId,
    pub version: u32,
    pub environment: String,
    #[serde(default)]
    pub size_bytes: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullResponse {
    pub version_id: VersionId,
    pub encrypted_data: String,
    pub format: String,
    pub version: u32,
    pub environment: String,
    #[serde(default, alias = "sops_metadata")]
    pub metadata: Option<Metadata>,
    #[serde(default)]
    pub size_bytes: u64,
    #[serde(default)]
    pub created_by: String,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VersionEntry {
    pub version_id: VersionId,
    pub version: u32,
    pub environment: String,
    #[serde(default)]
    pub created_by: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub size_bytes: u64,
}

#[derive(Debug, Serialize)]
pub struct RollbackRequest<'a> {
    pub version_id: &'a str,
}
