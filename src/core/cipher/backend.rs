//! Engine selection and dispatch.
//!
//! New ciphertext is produced by the configured engine. Existing ciphertext
//! is routed by its own metadata block, so a project can switch engines
//! without losing access to older versions.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use tracing::debug;
use zeroize::Zeroizing;

use super::{AgeEngine, Engine, Sealed, Sops};
use crate::core::config::Settings;
use crate::core::constants::env;
use crate::core::domain::Format;
use crate::core::keys::KeyFile;
use crate::core::policy::EncryptionPolicy;
use crate::core::types::Metadata;
use crate::error::{CipherError, ConfigError, Error, Result};

/// Engine used for new ciphertext.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EngineKind {
    #[default]
    Age,
    Sops,
}

impl EngineKind {
    pub fn name(&self) -> &'static str {
        match self {
            EngineKind::Age => "age",
            EngineKind::Sops => "sops",
        }
    }

    /// Detect the producing engine from a ciphertext document.
    pub fn detect(ciphertext: &[u8]) -> Option<Self> {
        let document: serde_json::Value = serde_json::from_slice(ciphertext).ok()?;
        if document.get("sops").is_some_and(|v| v.is_object()) {
            Some(EngineKind::Sops)
        } else if document.get("envv").is_some_and(|v| v.is_object()) {
            Some(EngineKind::Age)
        } else {
            None
        }
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EngineKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "age" => Ok(EngineKind::Age),
            "sops" => Ok(EngineKind::Sops),
            other => Err(ConfigError::InvalidSetting {
                name: env::ENGINE,
                reason: format!("unknown engine '{}', expected age or sops", other),
            }
            .into()),
        }
    }
}

/// Both engines behind one [`Engine`].
pub struct Backend {
    kind: EngineKind,
    age: AgeEngine,
    sops: Sops,
}

impl Backend {
    pub fn new(kind: EngineKind, age: AgeEngine, sops: Sops) -> Self {
        Self { kind, age, sops }
    }

    /// Build from settings, loading identities from the key file.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let keys = KeyFile::new(&settings.key_file);
        let age = AgeEngine::from_key_file(&keys)?;
        let sops = Sops::new(&settings.scratch_root, Some(settings.key_file.clone()));
        debug!(engine = settings.engine.name(), "creating engine backend");
        Ok(Self::new(settings.engine, age, sops))
    }

    pub fn kind(&self) -> EngineKind {
        self.kind
    }

    fn selected(&self) -> &dyn Engine {
        self.engine_for(self.kind)
    }

    fn engine_for(&self, kind: EngineKind) -> &dyn Engine {
        match kind {
            EngineKind::Age => &self.age,
            EngineKind::Sops => &self.sops,
        }
    }

    fn detected(&self, ciphertext: &[u8]) -> Result<&dyn Engine> {
        match EngineKind::detect(ciphertext) {
            Some(kind) => Ok(self.engine_for(kind)),
            None => Err(CipherError::Malformed(
                "not an age or sops document".to_string(),
            )
            .into()),
        }
    }
}

impl Engine for Backend {
    fn name(&self) -> &'static str {
        self.kind.name()
    }

    fn ensure_available(&self) -> Result<()> {
        self.selected().ensure_available()
    }

    fn encrypt(
        &self,
        plaintext: &Path,
        format: Format,
        policy: &EncryptionPolicy,
    ) -> Result<Sealed> {
        self.selected().encrypt(plaintext, format, policy)
    }

    fn decrypt(&self, ciphertext: &[u8], format: Format) -> Result<Zeroizing<Vec<u8>>> {
        let engine = self.detected(ciphertext)?;
        engine.ensure_available()?;
        engine.decrypt(ciphertext, format)
    }

    fn metadata(&self, ciphertext: &[u8]) -> Result<Metadata> {
        match EngineKind::detect(ciphertext) {
            Some(kind) => self.engine_for(kind).metadata(ciphertext),
            None => Err(CipherError::MetadataMissing {
                engine: self.kind.name(),
            }
            .into()),
        }
    }
}
