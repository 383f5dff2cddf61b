//! In-memory collaborators for driving the workflow without a server.
//!
//! Every collaborator can share a [`Journal`] so tests can assert on the
//! order of calls across them, and can be told to fail at a given call.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;

use zeroize::Zeroizing;

use envv::core::cipher::{Engine, Sealed};
use envv::core::directory::RecipientDirectory;
use envv::core::domain::{Environment, Format, Receipt, Recipient, SecretVersion, VersionSummary};
use envv::core::policy::EncryptionPolicy;
use envv::core::store::VersionStore;
use envv::core::types::Metadata;
use envv::error::{ApiError, Error, Result};

/// Ordered record of collaborator calls.
pub type Journal = Rc<RefCell<Vec<&'static str>>>;

pub fn journal() -> Journal {
    Rc::new(RefCell::new(Vec::new()))
}

fn record(journal: &Option<Journal>, event: &'static str) {
    if let Some(j) = journal {
        j.borrow_mut().push(event);
    }
}

/// Which store call should fail, and how.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreFault {
    None,
    PullForbidden,
    PullUnavailable,
    PushUnavailable,
}

/// Version store with per-(project, environment) monotonic versions.
pub struct MemoryStore {
    versions: RefCell<HashMap<(String, Environment), Vec<SecretVersion>>>,
    fault: Cell<StoreFault>,
    journal: Option<Journal>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            versions: RefCell::new(HashMap::new()),
            fault: Cell::new(StoreFault::None),
            journal: None,
        }
    }

    pub fn with_journal(journal: Journal) -> Self {
        Self {
            journal: Some(journal),
            ..Self::new()
        }
    }

    pub fn fail(&self, fault: StoreFault) {
        self.fault.set(fault);
    }

    /// Every stored version, oldest first.
    pub fn history(&self, project_id: &str, environment: Environment) -> Vec<SecretVersion> {
        self.versions
            .borrow()
            .get(&(project_id.to_string(), environment))
            .cloned()
            .unwrap_or_default()
    }

    pub fn latest(&self, project_id: &str, environment: Environment) -> Option<SecretVersion> {
        self.history(project_id, environment).pop()
    }

    pub fn count(&self, project_id: &str, environment: Environment) -> usize {
        self.history(project_id, environment).len()
    }

    fn append(
        &self,
        project_id: &str,
        environment: Environment,
        ciphertext: Vec<u8>,
        format: Format,
        metadata: Metadata,
    ) -> Receipt {
        let mut versions = self.versions.borrow_mut();
        let history = versions
            .entry((project_id.to_string(), environment))
            .or_default();
        let version = history.last().map(|v| v.version + 1).unwrap_or(1);
        let stored = SecretVersion {
            version_id: uuid::Uuid::new_v4().to_string(),
            environment,
            version,
            format,
            size_bytes: ciphertext.len() as u64,
            ciphertext,
            metadata,
            created_by: "alice@example.com".to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
        };
        let receipt = Receipt {
            version_id: stored.version_id.clone(),
            version,
            environment,
            size_bytes: stored.size_bytes,
        };
        history.push(stored);
        receipt
    }
}

impl VersionStore for MemoryStore {
    fn push(
        &self,
        project_id: &str,
        environment: Environment,
        ciphertext: &[u8],
        format: Format,
        metadata: &Metadata,
    ) -> Result<Receipt> {
        record(&self.journal, "push");
        if self.fault.get() == StoreFault::PushUnavailable {
            return Err(service_unavailable());
        }
        Ok(self.append(
            project_id,
            environment,
            ciphertext.to_vec(),
            format,
            metadata.clone(),
        ))
    }

    fn pull(&self, project_id: &str, environment: Environment) -> Result<SecretVersion> {
        record(&self.journal, "pull");
        match self.fault.get() {
            StoreFault::PullForbidden => {
                return Err(ApiError::Forbidden("read access required".to_string()).into())
            }
            StoreFault::PullUnavailable => return Err(service_unavailable()),
            _ => {}
        }
        self.latest(project_id, environment).ok_or_else(|| {
            ApiError::NotFound(format!("no secrets for {}", environment)).into()
        })
    }

    fn list_versions(
        &self,
        project_id: &str,
        environment: Environment,
    ) -> Result<Vec<VersionSummary>> {
        record(&self.journal, "list_versions");
        let mut summaries: Vec<VersionSummary> = self
            .history(project_id, environment)
            .iter()
            .map(SecretVersion::summary)
            .collect();
        summaries.reverse();
        Ok(summaries)
    }

    fn rollback(&self, project_id: &str, version_id: &str) -> Result<Receipt> {
        record(&self.journal, "rollback");
        let source = self
            .versions
            .borrow()
            .iter()
            .filter(|((project, _), _)| project == project_id)
            .flat_map(|(_, history)| history.iter())
            .find(|v| v.version_id == version_id)
            .cloned()
            .ok_or_else(|| Error::from(ApiError::NotFound(format!("version {}", version_id))))?;

        Ok(self.append(
            project_id,
            source.environment,
            source.ciphertext,
            source.format,
            source.metadata,
        ))
    }
}

fn service_unavailable() -> Error {
    ApiError::Service {
        status: 503,
        code: "unavailable".to_string(),
        message: "try again later".to_string(),
    }
    .into()
}

/// Directory whose membership tests can change between calls.
pub struct StaticDirectory {
    members: RefCell<Vec<Recipient>>,
    calls: Cell<usize>,
    fail: Cell<bool>,
    journal: Option<Journal>,
}

impl StaticDirectory {
    pub fn new(members: Vec<Recipient>) -> Self {
        Self {
            members: RefCell::new(members),
            calls: Cell::new(0),
            fail: Cell::new(false),
            journal: None,
        }
    }

    pub fn with_journal(members: Vec<Recipient>, journal: Journal) -> Self {
        Self {
            journal: Some(journal),
            ..Self::new(members)
        }
    }

    pub fn set_members(&self, members: Vec<Recipient>) {
        *self.members.borrow_mut() = members;
    }

    /// Drop a member, as an admin removing them from the project would.
    pub fn remove(&self, identity: &str) {
        self.members
            .borrow_mut()
            .retain(|m| m.identity() != identity);
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    pub fn fail(&self, fail: bool) {
        self.fail.set(fail);
    }
}

impl RecipientDirectory for StaticDirectory {
    fn list_recipients(&self, _project_id: &str) -> Result<Vec<Recipient>> {
        record(&self.journal, "list_recipients");
        self.calls.set(self.calls.get() + 1);
        if self.fail.get() {
            return Err(ApiError::Unauthorized("token expired".to_string()).into());
        }
        Ok(self.members.borrow().clone())
    }
}

/// Engine wrapper that journals calls and can fail on demand.
pub struct RecordingEngine<E> {
    inner: E,
    fail_encrypt: Cell<bool>,
    fail_decrypt: Cell<bool>,
    journal: Option<Journal>,
}

impl<E: Engine> RecordingEngine<E> {
    pub fn new(inner: E) -> Self {
        Self {
            inner,
            fail_encrypt: Cell::new(false),
            fail_decrypt: Cell::new(false),
            journal: None,
        }
    }

    pub fn with_journal(inner: E, journal: Journal) -> Self {
        Self {
            journal: Some(journal),
            ..Self::new(inner)
        }
    }

    pub fn fail_encrypt(&self, fail: bool) {
        self.fail_encrypt.set(fail);
    }

    pub fn fail_decrypt(&self, fail: bool) {
        self.fail_decrypt.set(fail);
    }
}

impl<E: Engine> Engine for RecordingEngine<E> {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn ensure_available(&self) -> Result<()> {
        self.inner.ensure_available()
    }

    fn encrypt(&self, plaintext: &Path, format: Format, policy: &EncryptionPolicy) -> Result<Sealed> {
        record(&self.journal, "encrypt");
        if self.fail_encrypt.get() {
            return Err(envv::error::CipherError::EncryptionFailed("injected".to_string()).into());
        }
        self.inner.encrypt(plaintext, format, policy)
    }

    fn decrypt(&self, ciphertext: &[u8], format: Format) -> Result<Zeroizing<Vec<u8>>> {
        record(&self.journal, "decrypt");
        if self.fail_decrypt.get() {
            return Err(envv::error::CipherError::Malformed("injected".to_string()).into());
        }
        self.inner.decrypt(ciphertext, format)
    }

    fn metadata(&self, ciphertext: &[u8]) -> Result<Metadata> {
        self.inner.metadata(ciphertext)
    }
}
