//! List versions command.

use crate::cli::context::ProjectContext;
use crate::cli::output;
use crate::core::domain::Environment;
use crate::error::Result;

/// Show the version history of an environment.
pub fn execute(env: Option<Environment>, json: bool) -> Result<()> {
    let project = ProjectContext::load()?;
    let env = project.binding.environment_or_default(env);
    let versions = project.workflow().versions(env)?;

    if json {
        let result = serde_json::json!({
            "environment": env,
            "versions": versions,
            "count": versions.len(),
        });
        output::data(&serde_json::to_string_pretty(&result)?);
    } else if versions.is_empty() {
        output::dimmed(&format!("no versions in {}", env));
    } else {
        output::section(&format!("{} versions", env));
        for v in &versions {
            output::kv(
                &format!("v{}", v.version),
                format!(
                    "{}  {}  {} bytes  {}",
                    v.version_id, v.created_at, v.size_bytes, v.created_by
                ),
            );
        }
    }
    Ok(())
}
