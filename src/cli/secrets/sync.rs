//! Sync command.

use super::{default_path, report_pushed};
use crate::cli::context::ProjectContext;
use crate::cli::output;
use crate::core::domain::Environment;
use crate::error::Result;

/// Pull the latest version if there is one, then push the local file.
pub fn execute(env: Option<Environment>) -> Result<()> {
    let project = ProjectContext::load()?;
    let env = project.binding.environment_or_default(env);
    let path = default_path(&project, env);

    let synced = project.workflow().sync(env, &path)?;
    match synced.pulled {
        Some(version) => output::dimmed(&format!("pulled version {}", version)),
        None => output::dimmed("no remote secrets yet, pushing the first version"),
    }
    report_pushed(&synced.pushed);
    Ok(())
}
