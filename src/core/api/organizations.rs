//! Organization endpoints.

use reqwest::Method;

use super::types::{CreateOrganizationRequest, InviteRequest, Organization, OrganizationMember};
use super::Client;
use crate::core::domain::Role;
use crate::error::Result;

impl Client {
    pub fn create_organization(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<Organization> {
        let body = CreateOrganizationRequest { name, description };
        self.request(Method::POST, "organizations", &[], Some(&body))
    }

    /// Organizations the current user belongs to.
    pub fn list_organizations(&self) -> Result<Vec<Organization>> {
        self.request::<(), _>(Method::GET, "organizations", &[], None)
    }

    pub fn get_organization(&self, organization_id: &str) -> Result<Organization> {
        let path = format!("organizations/{}", organization_id);
        self.request::<(), _>(Method::GET, &path, &[], None)
    }

    /// Every organization member with their registered public key.
    pub fn organization_member_keys(
        &self,
        organization_id: &str,
    ) -> Result<Vec<OrganizationMember>> {
        let path = format!("organizations/{}/members/keys", organization_id);
        self.request::<(), _>(Method::GET, &path, &[], None)
    }

    pub fn invite_member(&self, organization_id: &str, email: &str, role: Role) -> Result<()> {
        let path = format!("organizations/{}/invites", organization_id);
        self.request_empty(Method::POST, &path, Some(&InviteRequest { email, role }))
    }
}
