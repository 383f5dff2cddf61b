//! Project endpoints. The project member list backs the recipient directory.

use reqwest::Method;
use tracing::debug;

use super::types::{CreateProjectRequest, GrantRequest, Project, ProjectMembers};
use super::Client;
use crate::core::directory::RecipientDirectory;
use crate::core::domain::{Permission, Recipient};
use crate::error::Result;

impl Client {
    pub fn create_project(
        &self,
        organization_id: &str,
        name: &str,
        description: Option<&str>,
    ) -> Result<Project> {
        let path = format!("organizations/{}/projects", organization_id);
        let body = CreateProjectRequest {
            name,
            slug: None,
            description,
        };
        self.request(Method::POST, &path, &[], Some(&body))
    }

    pub fn list_projects(&self, organization_id: &str) -> Result<Vec<Project>> {
        self.request::<(), _>(
            Method::GET,
            "projects",
            &[("organization_id", organization_id)],
            None,
        )
    }

    pub fn get_project(&self, project_id: &str) -> Result<Project> {
        let path = format!("projects/{}", project_id);
        self.request::<(), _>(Method::GET, &path, &[], None)
    }

    pub fn project_members(&self, project_id: &str) -> Result<ProjectMembers> {
        let path = format!("projects/{}/members", project_id);
        self.request::<(), _>(Method::GET, &path, &[], None)
    }

    /// Grant `email` access to the project. Existing ciphertext is not
    /// readable by them until someone rotates.
    pub fn grant_access(&self, project_id: &str, email: &str, permission: Permission) -> Result<()> {
        let path = format!("projects/{}/access", project_id);
        self.request_empty(Method::POST, &path, Some(&GrantRequest { email, permission }))
    }

    /// Revoke a user's project access.
    pub fn revoke_access(&self, project_id: &str, user_id: &str) -> Result<()> {
        let path = format!("projects/{}/access/{}", project_id, user_id);
        self.request_empty::<()>(Method::DELETE, &path, None)
    }
}

impl RecipientDirectory for Client {
    fn list_recipients(&self, project_id: &str) -> Result<Vec<Recipient>> {
        let members = self.project_members(project_id)?;
        let recipients: Vec<Recipient> = members.members.into_iter().map(Recipient::from).collect();
        debug!(
            project = project_id,
            members = recipients.len(),
            keyed = recipients.iter().filter(|r| r.has_key()).count(),
            "recipients listed"
        );
        Ok(recipients)
    }
}
