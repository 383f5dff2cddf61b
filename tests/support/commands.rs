//! Command helper methods for Test.

use super::Test;
use assert_cmd::Command;
use std::process::Output;

use envv::core::config::{ProjectBinding, Session};
use envv::core::domain::Environment;

/// Nothing listens here; commands that reach the network fail fast.
pub const UNREACHABLE_API: &str = "http://127.0.0.1:9/api/v1";

impl Test {
    /// Create an envv command isolated to this test.
    ///
    /// - HOME points at the temporary home directory
    /// - the working directory is the temporary project directory
    /// - the API points at `UNREACHABLE_API` unless overridden
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("envv").expect("failed to find envv binary");
        cmd.env("HOME", self.home.path());
        // Windows uses USERPROFILE instead of HOME for home directory
        cmd.env("USERPROFILE", self.home.path());
        cmd.env("NO_COLOR", "1");
        cmd.env("ENVV_API_URL", UNREACHABLE_API);
        cmd.env("ENVV_SCRATCH_DIR", self.scratch.path());
        for var in [
            "ENVV_LOG",
            "ENVV_ENGINE",
            "ENVV_HOME",
            "ENVV_AGE_KEY_FILE",
            "SOPS_AGE_KEY_FILE",
            "ENVV_PASSWORD",
            "ENVV_HTTP_TIMEOUT_SECS",
        ] {
            cmd.env_remove(var);
        }
        cmd.current_dir(self.dir.path());
        cmd
    }

    /// Same as `cmd()` but talking to `api_url`.
    pub fn cmd_against(&self, api_url: &str) -> Command {
        let mut cmd = self.cmd();
        cmd.env("ENVV_API_URL", api_url);
        cmd
    }

    pub fn run(&self, args: &[&str]) -> Output {
        self.cmd()
            .args(args)
            .output()
            .expect("failed to run envv")
    }

    /// Path of the credentials file the binary reads.
    pub fn credentials_path(&self) -> std::path::PathBuf {
        self.home.path().join(".envv").join("credentials.json")
    }

    /// Path of the age key file the binary reads.
    pub fn key_path(&self) -> std::path::PathBuf {
        self.home
            .path()
            .join(".config")
            .join("sops")
            .join("age")
            .join("keys.txt")
    }

    /// Write a non-expiring session.
    pub fn login(&self, email: &str) {
        Session {
            access_token: "test-token".to_string(),
            user_id: "user-1".to_string(),
            email: email.to_string(),
            expires_at: String::new(),
        }
        .save(&self.credentials_path())
        .expect("failed to write session");
    }

    /// Write an already-expired session.
    pub fn login_expired(&self, email: &str) {
        Session {
            access_token: "test-token".to_string(),
            user_id: "user-1".to_string(),
            email: email.to_string(),
            expires_at: "2020-01-01T00:00:00Z".to_string(),
        }
        .save(&self.credentials_path())
        .expect("failed to write session");
    }

    /// Bind the project directory without going through `envv init`.
    pub fn bind(&self, org: &str, project: &str) {
        ProjectBinding {
            organization_id: org.to_string(),
            organization_name: None,
            project_id: project.to_string(),
            project_name: None,
            default_environment: Environment::Development,
        }
        .save_to(self.dir.path())
        .expect("failed to write binding");
    }

    /// Write a file in the project directory.
    pub fn write(&self, name: &str, contents: &str) -> std::path::PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, contents).expect("failed to write file");
        path
    }
}
