//! Encryption engine adapter.
//!
//! The protocol never touches cryptographic primitives directly. It drives an
//! [`Engine`] that encrypts a plaintext file against an
//! [`EncryptionPolicy`] and hands back ciphertext that describes its own
//! recipients, so decryption never needs to know which member set was active.
//!
//! ## Engines
//!
//! - **age** (default): in-process, using the age crate. Ciphertext is a JSON
//!   document with an `envv` metadata block.
//! - **sops**: shells out to the `sops` binary. Ciphertext is sops JSON with
//!   its `sops` metadata block.
//!
//! [`Backend`] picks the engine for new ciphertext from settings and detects
//! the engine for existing ciphertext from the document itself.

use std::path::Path;

use zeroize::Zeroizing;

use crate::core::domain::Format;
use crate::core::policy::EncryptionPolicy;
use crate::core::types::Metadata;
use crate::error::Result;

mod age;
mod backend;
mod sops;

pub use self::age::AgeEngine;
pub use backend::{Backend, EngineKind};
pub use sops::Sops;

/// Ciphertext plus the metadata extracted from it.
#[derive(Debug, Clone)]
pub struct Sealed {
    pub ciphertext: Vec<u8>,
    pub metadata: Metadata,
}

/// External encryption capability.
///
/// Implementations must check their dependency in
/// [`ensure_available`](Engine::ensure_available) and fail fast with
/// `CipherError::EngineUnavailable` rather than failing opaquely later.
pub trait Engine {
    /// Engine name for display and logs.
    fn name(&self) -> &'static str;

    /// Verify the capability can be invoked.
    fn ensure_available(&self) -> Result<()>;

    /// Encrypt the file at `plaintext` for every key in `policy`.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::MetadataMissing` if the produced ciphertext
    /// lacks the engine's self-describing metadata.
    fn encrypt(&self, plaintext: &Path, format: Format, policy: &EncryptionPolicy)
        -> Result<Sealed>;

    /// Recover plaintext bytes, rendered as `format`.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::PermissionDenied` when no local key is among
    /// the recipients and `CipherError::Malformed` when the ciphertext is
    /// damaged. The two need different remediation.
    fn decrypt(&self, ciphertext: &[u8], format: Format) -> Result<Zeroizing<Vec<u8>>>;

    /// Extract the engine metadata embedded in `ciphertext`.
    fn metadata(&self, ciphertext: &[u8]) -> Result<Metadata>;
}

/// Pull the metadata object stored under `key` from a JSON document.
pub(crate) fn embedded_metadata(
    ciphertext: &[u8],
    key: &str,
    engine: &'static str,
) -> Result<Metadata> {
    use crate::error::CipherError;

    let document: serde_json::Value = serde_json::from_slice(ciphertext)
        .map_err(|_| CipherError::MetadataMissing { engine })?;
    match document.get(key) {
        Some(serde_json::Value::Object(map)) => Ok(map.clone()),
        _ => Err(CipherError::MetadataMissing { engine }.into()),
    }
}
