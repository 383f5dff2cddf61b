//! Pull command.

use std::path::PathBuf;

use super::default_path;
use crate::cli::context::ProjectContext;
use crate::cli::output;
use crate::core::domain::Environment;
use crate::error::Result;

/// Decrypt the latest version into a local file.
pub fn execute(env: Option<Environment>, out: Option<PathBuf>) -> Result<()> {
    let project = ProjectContext::load()?;
    let env = project.binding.environment_or_default(env);
    let path = out.unwrap_or_else(|| default_path(&project, env));

    let version = project.workflow().pull(env, &path)?;

    output::success(&format!(
        "pulled {} version {} to {}",
        env,
        version.version,
        output::path(&path.display().to_string())
    ));
    if !version.created_by.is_empty() {
        output::kv("pushed by", &version.created_by);
    }
    Ok(())
}
