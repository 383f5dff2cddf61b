//! Error types.
//!
//! One crate-wide [`Error`] composed of per-concern enums, so callers can
//! match on the failure class (re-login, access denied, not found yet, ...)
//! instead of parsing messages.

use thiserror::Error;

use crate::core::workflow::Step;

/// Top-level error.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Cipher(#[from] CipherError),

    #[error(transparent)]
    Policy(#[from] PolicyError),

    #[error(transparent)]
    Key(#[from] KeyError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Rotation stopped before its commit point.
    #[error("rotation aborted during {step}: {source}")]
    Aborted {
        step: Step,
        #[source]
        source: Box<Error>,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),
}

/// Project binding, session and settings errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("not in an envv project")]
    NotInitialized,

    #[error("already initialized: .envv/config.toml exists (use --force to rebind)")]
    AlreadyInitialized,

    #[error("not logged in")]
    NotLoggedIn,

    #[error("session expired at {0}")]
    SessionExpired(String),

    #[error("failed to read {path}: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse project binding: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize project binding: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("corrupted credentials file: {0}")]
    Credentials(String),

    #[error("invalid setting {name}: {reason}")]
    InvalidSetting { name: &'static str, reason: String },

    #[error("unable to determine home directory")]
    NoHome,
}

/// Remote service errors, keyed on the HTTP status class.
#[derive(Error, Debug)]
pub enum ApiError {
    /// 401: missing, invalid or expired token.
    #[error("authentication failed: {0}")]
    Unauthorized(String),

    /// 403: authenticated but not allowed.
    #[error("access denied: {0}")]
    Forbidden(String),

    /// 404: project, organization or version does not exist (yet).
    #[error("not found: {0}")]
    NotFound(String),

    #[error("service error {status} ({code}): {message}")]
    Service {
        status: u16,
        code: String,
        message: String,
    },

    #[error("request failed: {0}")]
    Transport(String),

    #[error("failed to decode response: {0}")]
    Decode(String),
}

/// Encryption engine adapter errors.
#[derive(Error, Debug)]
pub enum CipherError {
    #[error("{engine} not found on PATH")]
    EngineUnavailable { engine: &'static str, hint: String },

    /// The caller's key is not among the ciphertext's recipients.
    #[error("you don't have permission to decrypt these secrets")]
    PermissionDenied,

    /// The ciphertext itself is damaged or not an engine document.
    #[error("ciphertext is malformed: {0}")]
    Malformed(String),

    #[error("ciphertext carries no {engine} metadata")]
    MetadataMissing { engine: &'static str },

    #[error("encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("decryption failed: {0}")]
    DecryptionFailed(String),

    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),
}

/// Encryption policy errors.
#[derive(Error, Debug)]
pub enum PolicyError {
    #[error("no recipients with a registered public key")]
    NoRecipients,
}

/// Local age key file errors.
#[derive(Error, Debug)]
pub enum KeyError {
    #[error("no age key found at {0}")]
    NoPrivateKey(String),

    #[error("invalid key format: {0}")]
    InvalidFormat(String),

    #[error("failed to read key file: {0}")]
    ReadFailed(#[source] std::io::Error),

    #[error("failed to write key file: {0}")]
    WriteFailed(#[source] std::io::Error),
}

/// Input validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("invalid environment '{0}': expected one of development, staging, production")]
    InvalidEnvironment(String),

    #[error("invalid format '{0}': expected one of dotenv, json, yaml")]
    InvalidFormat(String),

    #[error("file not found: {0}")]
    FileNotFound(String),

    #[error("{0} is required")]
    MissingValue(&'static str),

    #[error("insecure permissions on {path}: expected {expected}, found {actual}")]
    InvalidPermissions {
        path: String,
        expected: String,
        actual: String,
    },
}

impl Error {
    /// The underlying error, looking through rotation aborts.
    pub fn root(&self) -> &Error {
        match self {
            Error::Aborted { source, .. } => source.root(),
            other => other,
        }
    }

    /// Whether the remote reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self.root(), Error::Api(ApiError::NotFound(_)))
    }

    /// Whether the decrypting key is not among the recipients.
    pub fn is_permission_denied(&self) -> bool {
        matches!(self.root(), Error::Cipher(CipherError::PermissionDenied))
    }

    /// Remediation shown under the error message.
    pub fn hint(&self) -> Option<String> {
        let hint = match self.root() {
            Error::Config(ConfigError::NotInitialized) => {
                "run: envv init --org <id> --project <id>".to_string()
            }
            Error::Config(ConfigError::NotLoggedIn)
            | Error::Config(ConfigError::SessionExpired(_))
            | Error::Api(ApiError::Unauthorized(_)) => "run: envv auth login".to_string(),
            Error::Api(ApiError::Forbidden(_)) => {
                "ask a project admin to grant you access".to_string()
            }
            Error::Cipher(CipherError::PermissionDenied) => {
                "ask a project admin to run: envv secrets rotate".to_string()
            }
            Error::Cipher(CipherError::EngineUnavailable { hint, .. }) => hint.clone(),
            Error::Policy(PolicyError::NoRecipients) => {
                "project members must register an age public key first".to_string()
            }
            Error::Key(KeyError::NoPrivateKey(_)) => "run: envv auth register".to_string(),
            _ => return None,
        };
        Some(hint)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
