//! sops engine.
//!
//! Encrypts by shelling out to the `sops` CLI with the policy rendered as a
//! `.sops.yaml` in a scratch directory. Output is always sops JSON so the
//! `sops` metadata block can be extracted without decrypting.
//!
//! ## Requirements
//!
//! - `sops` must be on PATH
//! - decryption reads the age key file through `SOPS_AGE_KEY_FILE`

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tracing::{debug, trace};
use zeroize::Zeroizing;

use super::{embedded_metadata, Engine, Sealed};
use crate::core::domain::Format;
use crate::core::policy::EncryptionPolicy;
use crate::core::scratch::Scratch;
use crate::core::types::Metadata;
use crate::error::{CipherError, Result};

const BINARY: &str = "sops";
const METADATA_KEY: &str = "sops";
const INSTALL_HINT: &str = "install sops from https://github.com/getsops/sops";

/// Diagnostics sops prints when none of the caller's keys can open the data key.
const PERMISSION_MARKERS: &[&str] = &[
    "no valid decryption key",
    "failed to decrypt",
    "failed to get the data key",
    "no identity matched",
];

/// sops CLI engine.
#[derive(Debug, Clone)]
pub struct Sops {
    scratch_root: PathBuf,
    key_file: Option<PathBuf>,
}

impl Sops {
    pub fn new(scratch_root: impl Into<PathBuf>, key_file: Option<PathBuf>) -> Self {
        Self {
            scratch_root: scratch_root.into(),
            key_file,
        }
    }

    fn locate() -> Result<PathBuf> {
        which::which(BINARY).map_err(|_| {
            CipherError::EngineUnavailable {
                engine: BINARY,
                hint: INSTALL_HINT.to_string(),
            }
            .into()
        })
    }

    fn command(&self, binary: &Path) -> Command {
        let mut cmd = Command::new(binary);
        if let Some(key_file) = &self.key_file {
            cmd.env("SOPS_AGE_KEY_FILE", key_file);
        }
        cmd
    }

    fn run(cmd: &mut Command) -> Result<Output> {
        cmd.output().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CipherError::EngineUnavailable {
                    engine: BINARY,
                    hint: INSTALL_HINT.to_string(),
                }
                .into()
            } else {
                e.into()
            }
        })
    }
}

/// Map a failed decryption's stderr onto permission vs corruption.
pub(crate) fn classify_decrypt_failure(stderr: &str) -> CipherError {
    let lowered = stderr.to_lowercase();
    if PERMISSION_MARKERS.iter().any(|m| lowered.contains(m)) {
        CipherError::PermissionDenied
    } else {
        CipherError::Malformed(format!("sops decryption failed: {}", stderr.trim()))
    }
}

impl Engine for Sops {
    fn name(&self) -> &'static str {
        BINARY
    }

    fn ensure_available(&self) -> Result<()> {
        Self::locate().map(|_| ())
    }

    fn encrypt(
        &self,
        plaintext: &Path,
        format: Format,
        policy: &EncryptionPolicy,
    ) -> Result<Sealed> {
        let binary = Self::locate()?;
        let scratch = Scratch::new_in(&self.scratch_root)?;
        let config = scratch.write(".sops.yaml", policy.to_sops_yaml().as_bytes())?;

        trace!(
            recipients = policy.recipients().len(),
            format = format.as_str(),
            "encrypting with sops"
        );

        let output = Self::run(
            self.command(&binary)
                .arg("--config")
                .arg(&config)
                .args(["--input-type", format.as_str(), "--output-type", "json"])
                .arg("--encrypt")
                .arg(plaintext),
        )?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(
                CipherError::EncryptionFailed(format!("sops encrypt failed: {}", stderr.trim()))
                    .into(),
            );
        }

        let ciphertext = output.stdout;
        let metadata = self.metadata(&ciphertext)?;
        debug!(ciphertext_len = ciphertext.len(), "encrypted with sops");

        Ok(Sealed {
            ciphertext,
            metadata,
        })
    }

    fn decrypt(&self, ciphertext: &[u8], format: Format) -> Result<Zeroizing<Vec<u8>>> {
        let binary = Self::locate()?;
        let scratch = Scratch::new_in(&self.scratch_root)?;
        let input = scratch.write("ciphertext.json", ciphertext)?;

        trace!(ciphertext_len = ciphertext.len(), "decrypting with sops");

        let output = Self::run(
            self.command(&binary)
                .args(["--input-type", "json", "--output-type", format.as_str()])
                .arg("--decrypt")
                .arg(&input),
        )?;

        let plaintext = Zeroizing::new(output.stdout);
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(classify_decrypt_failure(&stderr).into());
        }

        trace!(plaintext_len = plaintext.len(), "decrypted with sops");
        Ok(plaintext)
    }

    fn metadata(&self, ciphertext: &[u8]) -> Result<Metadata> {
        embedded_metadata(ciphertext, METADATA_KEY, BINARY)
    }
}
