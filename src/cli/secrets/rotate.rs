//! Rotate command.

use crate::cli::context::ProjectContext;
use crate::cli::output;
use crate::core::domain::Environment;
use crate::core::workflow::Rotation;
use crate::error::Result;

/// Re-encrypt the latest version for the project's current members.
pub fn execute(env: Option<Environment>) -> Result<()> {
    let project = ProjectContext::load()?;
    let env = project.binding.environment_or_default(env);

    match project.workflow().rotate(env)? {
        Rotation::Rotated {
            previous,
            receipt,
            recipients,
            fingerprint,
        } => {
            output::success(&format!(
                "rotated {} version {} to version {}",
                env, previous, receipt.version
            ));
            output::kv("recipients", format!("{} ({})", recipients, fingerprint));
        }
        Rotation::NothingToRotate => {
            output::dimmed(&format!("nothing to rotate in {}", env));
        }
    }
    Ok(())
}
