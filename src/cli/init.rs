//! Init command - bind the current directory to a project.

use tracing::info;

use crate::cli::context::Context;
use crate::cli::output;
use crate::core::config::{self, ProjectBinding};
use crate::core::domain::Environment;
use crate::error::{ConfigError, Result};

/// Verify the project exists and write `.envv/config.toml`.
pub fn execute(org: &str, project: &str, env: Environment, force: bool) -> Result<()> {
    let root = std::env::current_dir()?;
    if ProjectBinding::exists_in(&root) && !force {
        return Err(ConfigError::AlreadyInitialized.into());
    }

    let ctx = Context::authenticated()?;
    let found = ctx.client.get_project(project)?;
    if found.organization_id != org {
        output::warn(&format!(
            "project {} belongs to organization {}, not {}",
            found.id, found.organization_id, org
        ));
    }
    let organization_name = ctx.client.get_organization(&found.organization_id).ok();

    let binding = ProjectBinding {
        organization_id: found.organization_id.clone(),
        organization_name: organization_name.map(|o| o.name),
        project_id: found.id.clone(),
        project_name: Some(found.name.clone()),
        default_environment: env,
    };
    binding.save_to(&root)?;
    config::ensure_gitignore(&root)?;
    info!(project = %binding.project_id, "directory bound");

    output::success(&format!(
        "bound to {} ({})",
        found.name,
        output::path(&ProjectBinding::path_in(&root).display().to_string())
    ));
    output::kv("default environment", env);
    output::hint(&format!(
        "push your first secrets: {}",
        output::cmd(&format!("envv secrets push {}", env.default_file()))
    ));
    Ok(())
}
