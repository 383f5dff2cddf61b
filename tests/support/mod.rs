//! Test support utilities for envv integration tests.
//!
//! Provides isolated CLI environments, in-memory collaborators and
//! age identities.

#![allow(dead_code)]

pub mod assertions;
pub mod commands;
pub mod memory;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;
#[allow(unused_imports)]
pub use memory::*;

use tempfile::TempDir;

/// Test environment with isolated temp directories.
///
/// Each test gets its own project dir, home dir and scratch root. Child
/// processes get them through `.current_dir()` and env vars, so tests can
/// run in parallel.
pub struct Test {
    /// Working directory for the project
    pub dir: TempDir,
    /// Home directory (credentials, age key)
    pub home: TempDir,
    /// Scratch root; must be empty after every command
    pub scratch: TempDir,
}

impl Test {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("failed to create temp dir"),
            home: TempDir::new().expect("failed to create temp home"),
            scratch: TempDir::new().expect("failed to create scratch root"),
        }
    }

    /// Environment with a session and a bound project.
    pub fn bound(project_id: &str) -> Self {
        let t = Self::new();
        t.login("alice@example.com");
        t.bind("org-1", project_id);
        t
    }
}
