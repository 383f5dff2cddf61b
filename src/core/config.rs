//! Configuration.
//!
//! Three explicit documents, each loaded once when a command starts and then
//! passed down:
//!
//! - [`Settings`]: process settings from `ENVV_*` environment variables
//! - [`Session`]: `~/.envv/credentials.json`, written by login/register
//! - [`ProjectBinding`]: `.envv/config.toml`, written by `envv init`

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::core::cipher::EngineKind;
use crate::core::constants::{self, env};
use crate::core::domain::Environment;
use crate::core::scratch;
use crate::core::types::{OrganizationId, ProjectId};
use crate::error::{ConfigError, Result};

/// Process-level settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Remote service base URL, without trailing slash.
    pub api_url: String,
    /// Fixed deadline applied to every remote call.
    pub timeout: Duration,
    /// Engine used for new ciphertext.
    pub engine: EngineKind,
    /// age key file shared with sops.
    pub key_file: PathBuf,
    /// Per-user state directory (credentials).
    pub home: PathBuf,
    /// Where scratch directories are created.
    pub scratch_root: PathBuf,
}

impl Settings {
    /// Read settings from the environment, applying defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidSetting` for unparsable values and
    /// `ConfigError::NoHome` if HOME cannot be determined.
    pub fn from_env() -> Result<Self> {
        let home_dir = dirs::home_dir().ok_or(ConfigError::NoHome)?;

        let api_url = std::env::var(env::API_URL)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| constants::DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let timeout = match std::env::var(env::HTTP_TIMEOUT) {
            Ok(raw) => {
                let secs = raw
                    .trim()
                    .parse::<u64>()
                    .ok()
                    .filter(|s| *s > 0)
                    .ok_or_else(|| ConfigError::InvalidSetting {
                        name: env::HTTP_TIMEOUT,
                        reason: format!("expected a positive number of seconds, got '{}'", raw),
                    })?;
                Duration::from_secs(secs)
            }
            Err(_) => Duration::from_secs(constants::DEFAULT_HTTP_TIMEOUT_SECS),
        };

        let engine = match std::env::var(env::ENGINE) {
            Ok(raw) => raw.parse()?,
            Err(_) => EngineKind::default(),
        };

        let key_file = std::env::var_os(env::KEY_FILE)
            .or_else(|| std::env::var_os(env::SOPS_KEY_FILE))
            .map(PathBuf::from)
            .unwrap_or_else(|| home_dir.join(constants::DEFAULT_KEY_FILE));

        let home = std::env::var_os(env::HOME)
            .map(PathBuf::from)
            .unwrap_or_else(|| home_dir.join(constants::HOME_DIR));

        let scratch_root = std::env::var_os(env::SCRATCH_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(std::env::temp_dir);

        let settings = Self {
            api_url,
            timeout,
            engine,
            key_file,
            home,
            scratch_root,
        };
        debug!(
            api_url = %settings.api_url,
            engine = settings.engine.name(),
            "settings loaded"
        );
        Ok(settings)
    }

    /// Path of the session credentials file.
    pub fn credentials_path(&self) -> PathBuf {
        self.home.join(constants::CREDENTIALS_FILE)
    }
}

/// Authenticated session for the current user.
#[derive(Clone, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub user_id: String,
    #[serde(default)]
    pub email: String,
    /// RFC 3339; empty means the server gave no expiry.
    #[serde(default)]
    pub expires_at: String,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"<redacted>")
            .field("user_id", &self.user_id)
            .field("email", &self.email)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

impl Session {
    /// Load the session from the credentials file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotLoggedIn` if there is no credentials file,
    /// or `ConfigError::Credentials` if it cannot be parsed.
    pub fn load(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading session");
        if !path.exists() {
            return Err(ConfigError::NotLoggedIn.into());
        }
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.display().to_string(),
            source,
        })?;
        let session: Self = serde_json::from_str(&contents)
            .map_err(|e| ConfigError::Credentials(e.to_string()))?;
        Ok(session)
    }

    /// Persist the session with owner-only permissions.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            scratch::create_private_dir(dir)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        scratch::write_private(path, contents.as_bytes())?;
        debug!(path = %path.display(), "session saved");
        Ok(())
    }

    /// Remove the credentials file. Missing files are not an error.
    pub fn clear(path: &Path) -> Result<()> {
        match std::fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Whether the session has expired as of `now`.
    ///
    /// An unparsable expiry counts as expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        if self.expires_at.trim().is_empty() {
            return false;
        }
        match DateTime::parse_from_rfc3339(self.expires_at.trim()) {
            Ok(expiry) => expiry.with_timezone(&Utc) <= now,
            Err(_) => true,
        }
    }

    /// Load the session and reject it if expired.
    pub fn require(path: &Path) -> Result<Self> {
        let session = Self::load(path)?;
        if session.is_expired_at(Utc::now()) {
            return Err(ConfigError::SessionExpired(session.expires_at).into());
        }
        Ok(session)
    }
}

/// Binding of a working directory to a remote project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectBinding {
    pub organization_id: OrganizationId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_name: Option<String>,
    pub project_id: ProjectId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    #[serde(default)]
    pub default_environment: Environment,
}

impl ProjectBinding {
    /// Binding file path under `root`.
    pub fn path_in(root: &Path) -> PathBuf {
        root.join(constants::PROJECT_DIR)
            .join(constants::BINDING_FILE)
    }

    pub fn exists_in(root: &Path) -> bool {
        Self::path_in(root).exists()
    }

    /// Load the binding from `root/.envv/config.toml`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotInitialized` if the file doesn't exist,
    /// or `ConfigError::Parse` if the TOML is malformed.
    pub fn load_from(root: &Path) -> Result<Self> {
        let path = Self::path_in(root);
        debug!(path = %path.display(), "loading project binding");

        if !path.exists() {
            return Err(ConfigError::NotInitialized.into());
        }
        let contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::ReadFile {
            path: path.display().to_string(),
            source,
        })?;
        let binding: Self = toml::from_str(&contents).map_err(ConfigError::Parse)?;

        debug!(
            project = %binding.project_id,
            environment = %binding.default_environment,
            "project binding loaded"
        );
        Ok(binding)
    }

    /// Load the binding for the current directory.
    pub fn load() -> Result<Self> {
        Self::load_from(&std::env::current_dir()?)
    }

    /// Write the binding to `root/.envv/config.toml`.
    pub fn save_to(&self, root: &Path) -> Result<()> {
        let path = Self::path_in(root);
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let contents = toml::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        std::fs::write(&path, contents)?;
        debug!(path = %path.display(), "project binding saved");
        Ok(())
    }

    /// The explicit environment, or the bound default.
    pub fn environment_or_default(&self, explicit: Option<Environment>) -> Environment {
        explicit.unwrap_or(self.default_environment)
    }
}

/// Ensure `.gitignore` in `root` ignores pulled plaintext.
///
/// Adds `.env`, `.env.*`, and `!.env.example` if not already present.
pub fn ensure_gitignore(root: &Path) -> Result<()> {
    let gitignore = root.join(".gitignore");

    let existing = if gitignore.exists() {
        std::fs::read_to_string(&gitignore)?
    } else {
        String::new()
    };

    let mut updated = existing.clone();
    for entry in constants::GITIGNORE_ENTRIES {
        if !existing.lines().any(|l| l.trim() == *entry) {
            if !updated.is_empty() && !updated.ends_with('\n') {
                updated.push('\n');
            }
            updated.push_str(entry);
            updated.push('\n');
        }
    }

    if updated != existing {
        std::fs::write(gitignore, updated)?;
    }

    Ok(())
}
