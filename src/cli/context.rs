//! Per-command context.
//!
//! Loads settings, session and project binding once at command start so
//! the workflow below never reads configuration mid-flow.

use std::path::PathBuf;

use crate::core::api::Client;
use crate::core::cipher::Backend;
use crate::core::config::{ProjectBinding, Session, Settings};
use crate::core::keys::KeyFile;
use crate::core::workflow::Workflow;
use crate::error::{Result, ValidationError};

/// Settings plus an authenticated client.
pub struct Context {
    pub settings: Settings,
    pub session: Session,
    pub client: Client,
}

impl Context {
    /// Load settings and require a valid session.
    pub fn authenticated() -> Result<Self> {
        let settings = Settings::from_env()?;
        let session = Session::require(&settings.credentials_path())?;
        let client = Client::authenticated(&settings, &session)?;
        Ok(Self {
            settings,
            session,
            client,
        })
    }

    pub fn key_file(&self) -> KeyFile {
        KeyFile::new(&self.settings.key_file)
    }

    /// The explicit organization, or the one bound to this directory.
    pub fn organization_or_bound(&self, explicit: Option<String>) -> Result<String> {
        match explicit {
            Some(id) => Ok(id),
            None => ProjectBinding::load()
                .map(|b| b.organization_id)
                .map_err(|_| ValidationError::MissingValue("--org").into()),
        }
    }

    /// The explicit project, or the one bound to this directory.
    pub fn project_or_bound(&self, explicit: Option<String>) -> Result<String> {
        match explicit {
            Some(id) => Ok(id),
            None => ProjectBinding::load()
                .map(|b| b.project_id)
                .map_err(|_| ValidationError::MissingValue("--project").into()),
        }
    }
}

/// Everything a secrets command needs.
pub struct ProjectContext {
    pub ctx: Context,
    pub binding: ProjectBinding,
    pub root: PathBuf,
    pub engine: Backend,
}

impl ProjectContext {
    /// Load the project binding for the current directory, then the session.
    ///
    /// The binding is checked first so an unbound directory reports
    /// `envv init` rather than a login problem.
    pub fn load() -> Result<Self> {
        let root = std::env::current_dir()?;
        let binding = ProjectBinding::load_from(&root)?;
        let ctx = Context::authenticated()?;
        let engine = Backend::from_settings(&ctx.settings)?;
        Ok(Self {
            ctx,
            binding,
            root,
            engine,
        })
    }

    pub fn workflow(&self) -> Workflow<'_> {
        Workflow::new(
            &self.ctx.client,
            &self.ctx.client,
            &self.engine,
            self.binding.project_id.clone(),
            self.ctx.settings.scratch_root.clone(),
        )
    }
}
