//! Push, pull and sync.

use std::path::Path;

use tracing::{debug, info};

use super::Workflow;
use crate::core::domain::{Environment, Format, Receipt, SecretVersion, VersionSummary};
use crate::core::policy::build_policy;
use crate::core::scratch;
use crate::error::{Result, ValidationError};

/// Outcome of a push.
#[derive(Debug, Clone)]
pub struct Pushed {
    pub receipt: Receipt,
    /// Keys the ciphertext was addressed to.
    pub recipients: usize,
    /// Members skipped because they have no registered key.
    pub keyless: Vec<String>,
    pub fingerprint: String,
}

/// Outcome of a sync.
#[derive(Debug, Clone)]
pub struct Synced {
    /// Version pulled first, `None` on a first sync.
    pub pulled: Option<u32>,
    pub pushed: Pushed,
}

impl Workflow<'_> {
    /// Encrypt `path` for the current project members and store it as a new
    /// version of `environment`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::FileNotFound` if `path` doesn't exist,
    /// `PolicyError::NoRecipients` if no member has a key, plus engine and
    /// store errors. Nothing is stored on failure.
    pub fn push(&self, path: &Path, environment: Environment, format: Format) -> Result<Pushed> {
        if !path.is_file() {
            return Err(ValidationError::FileNotFound(path.display().to_string()).into());
        }
        self.engine.ensure_available()?;

        let members = self.directory.list_recipients(&self.project_id)?;
        let keyless: Vec<String> = members
            .iter()
            .filter(|m| !m.has_key())
            .map(|m| m.identity().to_string())
            .collect();
        let policy = build_policy(&members)?;
        debug!(
            recipients = policy.recipients().len(),
            keyless = keyless.len(),
            fingerprint = %policy.fingerprint(),
            "policy built"
        );

        let sealed = self.engine.encrypt(path, format, &policy)?;
        let receipt = self.store.push(
            &self.project_id,
            environment,
            &sealed.ciphertext,
            format,
            &sealed.metadata,
        )?;

        info!(
            project = %self.project_id,
            %environment,
            version = receipt.version,
            "secrets pushed"
        );
        Ok(Pushed {
            receipt,
            recipients: policy.recipients().len(),
            keyless,
            fingerprint: policy.fingerprint(),
        })
    }

    /// Decrypt the latest version of `environment` into `output` (0600).
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if nothing was pushed yet and
    /// `CipherError::PermissionDenied` if the local key is not a recipient.
    /// `output` is left untouched on failure.
    pub fn pull(&self, environment: Environment, output: &Path) -> Result<SecretVersion> {
        let version = self.store.pull(&self.project_id, environment)?;
        let plaintext = self.engine.decrypt(&version.ciphertext, version.format)?;

        if let Some(dir) = output.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        scratch::write_private(output, &plaintext)?;

        info!(
            project = %self.project_id,
            %environment,
            version = version.version,
            "secrets pulled"
        );
        Ok(version)
    }

    /// Pull the latest version into `local` if one exists, then push `local`.
    ///
    /// Only a structured not-found on the pull counts as a first sync; any
    /// other pull failure aborts before anything is pushed.
    pub fn sync(&self, environment: Environment, local: &Path) -> Result<Synced> {
        let (pulled, format) = match self.pull(environment, local) {
            Ok(version) => (Some(version.version), version.format),
            Err(e) if e.is_not_found() => {
                info!(%environment, "no remote secrets yet, first sync");
                (None, Format::infer(local))
            }
            Err(e) => return Err(e),
        };

        let pushed = self.push(local, environment, format)?;
        Ok(Synced { pulled, pushed })
    }

    /// Version history of `environment`, newest first.
    pub fn versions(&self, environment: Environment) -> Result<Vec<VersionSummary>> {
        self.store.list_versions(&self.project_id, environment)
    }

    /// Re-publish `version_id` as the new latest version.
    pub fn rollback(&self, version_id: &str) -> Result<Receipt> {
        if version_id.trim().is_empty() {
            return Err(ValidationError::MissingValue("version id").into());
        }
        let receipt = self.store.rollback(&self.project_id, version_id)?;
        info!(
            project = %self.project_id,
            from = version_id,
            version = receipt.version,
            "rolled back"
        );
        Ok(receipt)
    }
}
