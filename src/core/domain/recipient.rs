//! Project member who may receive ciphertext.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::types::PublicKey;

/// Organization-level role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Owner,
    Admin,
    Member,
}

/// Project-level permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    Read,
    Write,
    Admin,
}

/// How a recipient is entitled: through the organization or the project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Role(Role),
    Permission(Permission),
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Access::Role(Role::Owner) => "owner",
            Access::Role(Role::Admin) | Access::Permission(Permission::Admin) => "admin",
            Access::Role(Role::Member) => "member",
            Access::Permission(Permission::Read) => "read",
            Access::Permission(Permission::Write) => "write",
        };
        f.write_str(s)
    }
}

/// A team member as listed by the recipient directory.
///
/// Members without a registered public key are still listed; they are
/// skipped when a policy is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipient {
    identity: String,
    name: Option<String>,
    public_key: Option<PublicKey>,
    access: Access,
}

impl Recipient {
    /// Create a recipient identified by email.
    ///
    /// Blank keys are treated as missing.
    pub fn new(identity: impl Into<String>, public_key: Option<PublicKey>, access: Access) -> Self {
        let public_key = public_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());
        Self {
            identity: identity.into(),
            name: None,
            public_key,
            access,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !name.is_empty() {
            self.name = Some(name);
        }
        self
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn public_key(&self) -> Option<&str> {
        self.public_key.as_deref()
    }

    pub fn has_key(&self) -> bool {
        self.public_key.is_some()
    }

    pub fn access(&self) -> Access {
        self.access
    }
}
