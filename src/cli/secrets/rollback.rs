//! Rollback command.

use crate::cli::context::ProjectContext;
use crate::cli::output;
use crate::error::Result;

/// Publish an earlier version's ciphertext as the new latest.
pub fn execute(version_id: &str) -> Result<()> {
    let project = ProjectContext::load()?;
    let receipt = project.workflow().rollback(version_id)?;

    output::success(&format!(
        "restored {} as {} version {}",
        version_id, receipt.environment, receipt.version
    ));
    output::hint(&format!(
        "update your local file: {}",
        output::cmd(&format!("envv secrets pull --env {}", receipt.environment))
    ));
    Ok(())
}
