//! Constants used throughout envv.
//!
//! Centralizes file names, defaults and environment variable names.

/// Project binding directory, relative to the working directory.
pub const PROJECT_DIR: &str = ".envv";

/// Project binding file inside [`PROJECT_DIR`].
pub const BINDING_FILE: &str = "config.toml";

/// Per-user state directory relative to HOME (~/.envv).
pub const HOME_DIR: &str = ".envv";

/// Session credentials file inside the home state directory.
pub const CREDENTIALS_FILE: &str = "credentials.json";

/// Default age key file relative to HOME, shared with sops.
pub const DEFAULT_KEY_FILE: &str = ".config/sops/age/keys.txt";

/// Default remote service base URL.
pub const DEFAULT_API_URL: &str = "https://api.envv.app/api/v1";

/// Fixed per-call deadline for remote requests, in seconds.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Path pattern of the single rule emitted by the policy builder.
///
/// Matches any staged file; the engine only ever sees one plaintext at a time.
pub const DEFAULT_PATH_PATTERN: &str = ".*";

/// Prefix for scratch directories.
pub const SCRATCH_PREFIX: &str = "envv-";

/// Environment variables read by [`Settings`](crate::core::config::Settings).
pub mod env {
    pub const API_URL: &str = "ENVV_API_URL";
    pub const HTTP_TIMEOUT: &str = "ENVV_HTTP_TIMEOUT_SECS";
    pub const ENGINE: &str = "ENVV_ENGINE";
    pub const KEY_FILE: &str = "ENVV_AGE_KEY_FILE";
    pub const SOPS_KEY_FILE: &str = "SOPS_AGE_KEY_FILE";
    pub const HOME: &str = "ENVV_HOME";
    pub const SCRATCH_DIR: &str = "ENVV_SCRATCH_DIR";
    pub const LOG: &str = "ENVV_LOG";
    /// `json` switches log output to one JSON object per line.
    pub const LOG_FORMAT: &str = "ENVV_LOG_FORMAT";
}

/// Gitignore entries to protect pulled plaintext.
pub const GITIGNORE_ENTRIES: &[&str] = &[".env", ".env.*", "!.env.example"];
