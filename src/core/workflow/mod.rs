//! The primary interface for secret operations.
//!
//! Workflow composes the recipient directory, policy builder, engine and
//! version store into push/pull/sync/rotate. It holds no hidden state: every
//! collaborator and setting is handed in when it is constructed.

mod rotation;
mod secrets;

pub use rotation::{Rotation, Step};
pub use secrets::{Pushed, Synced};

use std::path::{Path, PathBuf};

use crate::core::cipher::Engine;
use crate::core::directory::RecipientDirectory;
use crate::core::store::VersionStore;
use crate::core::types::ProjectId;

/// Secret operations against one project.
pub struct Workflow<'a> {
    pub(super) store: &'a dyn VersionStore,
    pub(super) directory: &'a dyn RecipientDirectory,
    pub(super) engine: &'a dyn Engine,
    pub(super) project_id: ProjectId,
    pub(super) scratch_root: PathBuf,
}

impl std::fmt::Debug for Workflow<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workflow")
            .field("project_id", &self.project_id)
            .field("engine", &self.engine.name())
            .field("scratch_root", &self.scratch_root)
            .finish()
    }
}

impl<'a> Workflow<'a> {
    pub fn new(
        store: &'a dyn VersionStore,
        directory: &'a dyn RecipientDirectory,
        engine: &'a dyn Engine,
        project_id: impl Into<ProjectId>,
        scratch_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            store,
            directory,
            engine,
            project_id: project_id.into(),
            scratch_root: scratch_root.into(),
        }
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn scratch_root(&self) -> &Path {
        &self.scratch_root
    }
}
