//! Organization commands.

use crate::cli::context::Context;
use crate::cli::output;
use crate::core::domain::{Recipient, Role};
use crate::error::Result;

pub fn create(name: &str, description: Option<&str>) -> Result<()> {
    let ctx = Context::authenticated()?;
    let org = ctx.client.create_organization(name, description)?;

    output::success(&format!("created organization {}", org.name));
    output::kv("id", &org.id);
    output::hint(&format!(
        "create a project: {}",
        output::cmd(&format!("envv project create <name> --org {}", org.id))
    ));
    Ok(())
}

pub fn list(json: bool) -> Result<()> {
    let ctx = Context::authenticated()?;
    let orgs = ctx.client.list_organizations()?;

    if json {
        let items: Vec<_> = orgs
            .iter()
            .map(|o| {
                serde_json::json!({
                    "id": o.id,
                    "name": o.name,
                    "role": o.role,
                    "member_count": o.member_count,
                })
            })
            .collect();
        output::data(&serde_json::to_string_pretty(&items)?);
    } else if orgs.is_empty() {
        output::dimmed("no organizations");
    } else {
        output::section(&format!("{} organizations", output::count(orgs.len())));
        for org in &orgs {
            let role = org
                .role
                .map(|r| format!(" ({})", role_name(r)))
                .unwrap_or_default();
            output::kv(&org.id, format!("{}{}", org.name, role));
        }
    }
    Ok(())
}

fn role_name(role: Role) -> &'static str {
    match role {
        Role::Owner => "owner",
        Role::Admin => "admin",
        Role::Member => "member",
    }
}

/// List members with their registered keys.
pub fn members(org: Option<String>) -> Result<()> {
    let ctx = Context::authenticated()?;
    let org = ctx.organization_or_bound(org)?;
    let members: Vec<Recipient> = ctx
        .client
        .organization_member_keys(&org)?
        .into_iter()
        .map(Recipient::from)
        .collect();

    print_members(&members);
    Ok(())
}

pub fn invite(email: &str, role: Role, org: Option<String>) -> Result<()> {
    let ctx = Context::authenticated()?;
    let org = ctx.organization_or_bound(org)?;
    ctx.client.invite_member(&org, email, role)?;
    output::success(&format!("invited {} as {}", email, role_name(role)));
    Ok(())
}

/// Shared by `org members` and `project members`.
pub(crate) fn print_members(members: &[Recipient]) {
    if members.is_empty() {
        output::dimmed("no members");
        return;
    }

    output::section(&format!("{} members", output::count(members.len())));
    for member in members {
        let key = member
            .public_key()
            .map(output::short_key)
            .unwrap_or_else(|| "no key".to_string());
        output::kv(member.identity(), format!("{}  {}", member.access(), key));
    }

    let keyless = members.iter().filter(|m| !m.has_key()).count();
    if keyless > 0 {
        output::blank();
        output::warn(&format!(
            "{} member(s) have no public key and won't receive secrets",
            keyless
        ));
    }
}
