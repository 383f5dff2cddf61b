//! Encryption policy builder.
//!
//! Turns the recipient directory's view of a project into the declarative
//! rule set an engine encrypts against. Building is pure: the same members
//! always yield the same policy, with keys in sorted order.

use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;

use crate::core::constants;
use crate::core::domain::Recipient;
use crate::core::types::PublicKey;
use crate::error::{PolicyError, Result};

/// One creation rule: files matching `path_regex` go to `recipients`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyRule {
    pub path_regex: String,
    pub recipients: BTreeSet<PublicKey>,
}

/// Ordered creation rules. Never contains a rule with no recipients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncryptionPolicy {
    rules: Vec<PolicyRule>,
}

/// Build the policy for `recipients`, skipping members without a key.
///
/// # Errors
///
/// Returns `PolicyError::NoRecipients` if no member holds a key. An empty
/// policy would produce ciphertext nobody can ever read.
pub fn build_policy(recipients: &[Recipient]) -> Result<EncryptionPolicy> {
    let keys: BTreeSet<PublicKey> = recipients
        .iter()
        .filter_map(|r| r.public_key())
        .map(str::to_string)
        .collect();

    if keys.is_empty() {
        return Err(PolicyError::NoRecipients.into());
    }

    Ok(EncryptionPolicy {
        rules: vec![PolicyRule {
            path_regex: constants::DEFAULT_PATH_PATTERN.to_string(),
            recipients: keys,
        }],
    })
}

impl EncryptionPolicy {
    pub fn rules(&self) -> &[PolicyRule] {
        &self.rules
    }

    /// Every key addressed by any rule, sorted and deduplicated.
    pub fn recipients(&self) -> BTreeSet<&str> {
        self.rules
            .iter()
            .flat_map(|rule| rule.recipients.iter().map(String::as_str))
            .collect()
    }

    /// Rule applied to staged plaintext. Engines stage one file at a time,
    /// so the first rule wins.
    pub fn primary(&self) -> &PolicyRule {
        &self.rules[0]
    }

    /// Short, stable digest of the recipient set for display and logs.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for key in self.recipients() {
            hasher.update(key.as_bytes());
            hasher.update(b"\n");
        }
        let digest = format!("{:x}", hasher.finalize());
        digest[..12].to_string()
    }

    /// Render as a sops `.sops.yaml` creation-rules document.
    pub fn to_sops_yaml(&self) -> String {
        let mut out = String::from("creation_rules:\n");
        for rule in &self.rules {
            out.push_str(&format!(
                "  - path_regex: '{}'\n",
                rule.path_regex.replace('\'', "''")
            ));
            let keys: Vec<&str> = rule.recipients.iter().map(String::as_str).collect();
            out.push_str(&format!("    age: '{}'\n", keys.join(",")));
        }
        out
    }
}
