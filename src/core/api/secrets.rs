//! Secrets endpoints, implementing the version store.

use reqwest::Method;
use tracing::debug;

use super::types::{PullResponse, PushRequest, PushResponse, RollbackRequest, VersionEntry};
use super::Client;
use crate::core::domain::{Environment, Format, Receipt, SecretVersion, VersionSummary};
use crate::core::store::VersionStore;
use crate::core::types::Metadata;
use crate::error::{ApiError, CipherError, Error, Result};

fn parse_environment(raw: &str) -> Result<Environment> {
    raw.parse()
        .map_err(|_| ApiError::Decode(format!("unknown environment '{}'", raw)).into())
}

fn receipt(response: PushResponse) -> Result<Receipt> {
    Ok(Receipt {
        environment: parse_environment(&response.environment)?,
        version_id: response.version_id,
        version: response.version,
        size_bytes: response.size_bytes,
    })
}

impl TryFrom<PullResponse> for SecretVersion {
    type Error = Error;

    fn try_from(response: PullResponse) -> Result<Self> {
        let format: Format = response
            .format
            .parse()
            .map_err(|_| ApiError::Decode(format!("unknown format '{}'", response.format)))?;
        Ok(SecretVersion {
            environment: parse_environment(&response.environment)?,
            version_id: response.version_id,
            version: response.version,
            format,
            ciphertext: response.encrypted_data.into_bytes(),
            metadata: response.metadata.unwrap_or_default(),
            size_bytes: response.size_bytes,
            created_by: response.created_by,
            created_at: response.created_at,
        })
    }
}

impl VersionStore for Client {
    fn push(
        &self,
        project_id: &str,
        environment: Environment,
        ciphertext: &[u8],
        format: Format,
        metadata: &Metadata,
    ) -> Result<Receipt> {
        // Both engines emit JSON documents.
        let encrypted_data = std::str::from_utf8(ciphertext).map_err(|_| {
            CipherError::Malformed("ciphertext is not a UTF-8 document".to_string())
        })?;
        let body = PushRequest {
            encrypted_data,
            format: format.as_str(),
            environment: environment.as_str(),
            metadata,
        };

        let path = format!("projects/{}/secrets", project_id);
        let response: PushResponse = self.request(Method::POST, &path, &[], Some(&body))?;
        debug!(
            project = project_id,
            %environment,
            version = response.version,
            "version pushed"
        );
        receipt(response)
    }

    fn pull(&self, project_id: &str, environment: Environment) -> Result<SecretVersion> {
        let path = format!("projects/{}/secrets", project_id);
        let response: PullResponse = self.request::<(), _>(
            Method::GET,
            &path,
            &[("environment", environment.as_str())],
            None,
        )?;
        debug!(
            project = project_id,
            %environment,
            version = response.version,
            "version pulled"
        );
        SecretVersion::try_from(response)
    }

    fn list_versions(
        &self,
        project_id: &str,
        environment: Environment,
    ) -> Result<Vec<VersionSummary>> {
        let path = format!("projects/{}/secrets/versions", project_id);
        let entries: Vec<VersionEntry> = self.request::<(), _>(
            Method::GET,
            &path,
            &[("environment", environment.as_str())],
            None,
        )?;

        let mut versions = entries
            .into_iter()
            .map(|e| {
                Ok(VersionSummary {
                    environment: parse_environment(&e.environment)?,
                    version_id: e.version_id,
                    version: e.version,
                    size_bytes: e.size_bytes,
                    created_by: e.created_by,
                    created_at: e.created_at,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        versions.sort_by(|a, b| b.version.cmp(&a.version));
        Ok(versions)
    }

    fn rollback(&self, project_id: &str, version_id: &str) -> Result<Receipt> {
        let path = format!("projects/{}/secrets/rollback", project_id);
        let response: PushResponse =
            self.request(Method::POST, &path, &[], Some(&RollbackRequest { version_id }))?;
        debug!(
            project = project_id,
            from = version_id,
            version = response.version,
            "rolled back"
        );
        receipt(response)
    }
}
