//! Rotation.
//!
//! Re-encrypts the latest version of an environment for the project's
//! *current* members:
//!
//! ```text
//! FetchCurrent -> Decrypt -> RefreshRecipients -> BuildPolicy -> Encrypt -> Push -> Done
//!       |            |              |                  |            |        |
//!       +------------+--------------+------------------+------------+--------+--> Aborted
//! ```
//!
//! The push is the only write. Plaintext is staged in a [`Scratch`] owned by
//! this call, so it is removed on every exit path.

use std::fmt;

use tracing::{debug, info};

use super::Workflow;
use crate::core::domain::{Environment, Receipt};
use crate::core::policy::build_policy;
use crate::core::scratch::Scratch;
use crate::error::{Error, Result};

/// Rotation step, named in `Error::Aborted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    FetchCurrent,
    Decrypt,
    RefreshRecipients,
    BuildPolicy,
    Encrypt,
    Push,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Step::FetchCurrent => "fetch current",
            Step::Decrypt => "decrypt",
            Step::RefreshRecipients => "refresh recipients",
            Step::BuildPolicy => "build policy",
            Step::Encrypt => "encrypt",
            Step::Push => "push",
        };
        f.write_str(s)
    }
}

/// Outcome of a rotation.
#[derive(Debug, Clone)]
pub enum Rotation {
    Rotated {
        /// Version that was re-encrypted.
        previous: u32,
        receipt: Receipt,
        recipients: usize,
        fingerprint: String,
    },
    /// Nothing stored for the environment yet.
    NothingToRotate,
}

fn at(step: Step) -> impl FnOnce(Error) -> Error {
    move |source| {
        debug!(%step, error = %source, "rotation aborted");
        Error::Aborted {
            step,
            source: Box::new(source),
        }
    }
}

impl Workflow<'_> {
    /// Rotate `environment` to the current recipient set.
    ///
    /// # Errors
    ///
    /// Returns `Error::Aborted` naming the failed step. The store is never
    /// written unless every earlier step succeeded.
    pub fn rotate(&self, environment: Environment) -> Result<Rotation> {
        debug!(step = %Step::FetchCurrent, %environment, "rotation");
        let current = match self.store.pull(&self.project_id, environment) {
            Ok(version) => version,
            Err(e) if e.is_not_found() => {
                info!(%environment, "nothing to rotate");
                return Ok(Rotation::NothingToRotate);
            }
            Err(e) => return Err(at(Step::FetchCurrent)(e)),
        };

        debug!(step = %Step::Decrypt, version = current.version, "rotation");
        let scratch = Scratch::new_in(&self.scratch_root).map_err(at(Step::Decrypt))?;
        let staged = {
            let plaintext = self
                .engine
                .decrypt(&current.ciphertext, current.format)
                .map_err(at(Step::Decrypt))?;
            scratch
                .write(&format!("plaintext.{}", current.format), &plaintext)
                .map_err(at(Step::Decrypt))?
        };

        // Must follow the decrypt: membership may have changed since the
        // current version was written.
        debug!(step = %Step::RefreshRecipients, "rotation");
        let members = self
            .directory
            .list_recipients(&self.project_id)
            .map_err(at(Step::RefreshRecipients))?;

        debug!(step = %Step::BuildPolicy, members = members.len(), "rotation");
        let policy = build_policy(&members).map_err(at(Step::BuildPolicy))?;

        debug!(step = %Step::Encrypt, fingerprint = %policy.fingerprint(), "rotation");
        let sealed = self
            .engine
            .encrypt(&staged, current.format, &policy)
            .map_err(at(Step::Encrypt))?;

        debug!(step = %Step::Push, "rotation");
        let receipt = self
            .store
            .push(
                &self.project_id,
                environment,
                &sealed.ciphertext,
                current.format,
                &sealed.metadata,
            )
            .map_err(at(Step::Push))?;

        drop(scratch);
        info!(
            project = %self.project_id,
            %environment,
            from = current.version,
            to = receipt.version,
            recipients = policy.recipients().len(),
            "secrets rotated"
        );

        Ok(Rotation::Rotated {
            previous: current.version,
            receipt,
            recipients: policy.recipients().len(),
            fingerprint: policy.fingerprint(),
        })
    }
}
