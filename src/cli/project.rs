//! Project commands.

use crate::cli::context::Context;
use crate::cli::org::print_members;
use crate::cli::output;
use crate::core::directory::RecipientDirectory;
use crate::core::domain::Permission;
use crate::error::Result;

pub fn create(name: &str, org: Option<String>, description: Option<&str>) -> Result<()> {
    let ctx = Context::authenticated()?;
    let org = ctx.organization_or_bound(org)?;
    let project = ctx.client.create_project(&org, name, description)?;

    output::success(&format!("created project {}", project.name));
    output::kv("id", &project.id);
    output::hint(&format!(
        "bind this directory: {}",
        output::cmd(&format!(
            "envv init --org {} --project {}",
            project.organization_id, project.id
        ))
    ));
    Ok(())
}

pub fn list(org: Option<String>, json: bool) -> Result<()> {
    let ctx = Context::authenticated()?;
    let org = ctx.organization_or_bound(org)?;
    let projects = ctx.client.list_projects(&org)?;

    if json {
        let items: Vec<_> = projects
            .iter()
            .map(|p| {
                serde_json::json!({
                    "id": p.id,
                    "name": p.name,
                    "organization_id": p.organization_id,
                    "needs_reencryption": p.needs_reencryption,
                })
            })
            .collect();
        output::data(&serde_json::to_string_pretty(&items)?);
    } else if projects.is_empty() {
        output::dimmed("no projects");
    } else {
        output::section(&format!("{} projects", output::count(projects.len())));
        for project in &projects {
            let flag = if project.needs_reencryption {
                "  (needs rotation)"
            } else {
                ""
            };
            output::kv(&project.id, format!("{}{}", project.name, flag));
        }
    }
    Ok(())
}

pub fn members(project: Option<String>) -> Result<()> {
    let ctx = Context::authenticated()?;
    let project = ctx.project_or_bound(project)?;
    let members = ctx.client.list_recipients(&project)?;
    print_members(&members);
    Ok(())
}

pub fn grant(email: &str, permission: Permission) -> Result<()> {
    let ctx = Context::authenticated()?;
    let project = ctx.project_or_bound(None)?;
    ctx.client.grant_access(&project, email, permission)?;

    output::success(&format!("granted {} access to {}", email, project));
    output::hint(&format!(
        "re-encrypt for them: {}",
        output::cmd("envv secrets rotate")
    ));
    Ok(())
}

pub fn revoke(user_id: &str) -> Result<()> {
    let ctx = Context::authenticated()?;
    let project = ctx.project_or_bound(None)?;
    ctx.client.revoke_access(&project, user_id)?;

    output::success(&format!("revoked {} from {}", user_id, project));
    output::hint(&format!(
        "existing versions stay readable by them until you run {}",
        output::cmd("envv secrets rotate")
    ));
    Ok(())
}
