//! Push command.

use std::path::PathBuf;

use super::{default_path, report_pushed};
use crate::cli::context::ProjectContext;
use crate::core::domain::{Environment, Format};
use crate::error::Result;

/// Encrypt a local file for the current members and push it.
pub fn execute(
    file: Option<PathBuf>,
    env: Option<Environment>,
    format: Option<Format>,
) -> Result<()> {
    let project = ProjectContext::load()?;
    let env = project.binding.environment_or_default(env);
    let path = file.unwrap_or_else(|| default_path(&project, env));
    let format = format.unwrap_or_else(|| Format::infer(&path));

    let pushed = project.workflow().push(&path, env, format)?;
    report_pushed(&pushed);
    Ok(())
}
