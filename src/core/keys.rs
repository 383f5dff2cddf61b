//! Local age key file.
//!
//! The same `keys.txt` layout sops reads, so either engine can decrypt with
//! it: comment lines plus one `AGE-SECRET-KEY-...` line per identity.

use std::fs;
use std::path::{Path, PathBuf};

use age::x25519;
use tracing::{debug, warn};

use crate::core::scratch;
use crate::core::types::PublicKey;
use crate::error::{Error, KeyError, Result, ValidationError};

const SECRET_KEY_PREFIX: &str = "AGE-SECRET-KEY-";
const PUBLIC_KEY_COMMENT: &str = "# public key:";

/// Validate file permissions (Unix only).
///
/// Checks that a file has the expected permissions mode.
#[cfg(unix)]
fn validate_file_permissions(path: &Path, expected_mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = fs::metadata(path)?;
    let actual_mode = metadata.permissions().mode() & 0o777;

    if actual_mode & !expected_mode != 0 {
        return Err(ValidationError::InvalidPermissions {
            path: path.display().to_string(),
            expected: format!("{:o}", expected_mode),
            actual: format!("{:o}", actual_mode),
        }
        .into());
    }

    Ok(())
}

/// Handle on the age key file.
#[derive(Debug, Clone)]
pub struct KeyFile {
    path: PathBuf,
}

impl KeyFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load every identity in the key file.
    ///
    /// # Errors
    ///
    /// Returns `KeyError::NoPrivateKey` if the file doesn't exist or holds
    /// no identity, or `KeyError::InvalidFormat` if a key line is malformed.
    pub fn load_identities(&self) -> Result<Vec<x25519::Identity>> {
        debug!(path = %self.path.display(), "loading age identities");

        if !self.path.exists() {
            return Err(KeyError::NoPrivateKey(self.path.display().to_string()).into());
        }

        #[cfg(unix)]
        if let Err(e) = validate_file_permissions(&self.path, 0o600) {
            warn!(error = %e, "insecure key file permissions");
        }

        let contents = fs::read_to_string(&self.path).map_err(KeyError::ReadFailed)?;
        let identities = contents
            .lines()
            .map(str::trim)
            .filter(|line| line.starts_with(SECRET_KEY_PREFIX))
            .map(|line| {
                line.parse::<x25519::Identity>()
                    .map_err(|e: &str| Error::from(KeyError::InvalidFormat(e.to_string())))
            })
            .collect::<Result<Vec<_>>>()?;

        if identities.is_empty() {
            return Err(KeyError::NoPrivateKey(self.path.display().to_string()).into());
        }

        debug!(count = identities.len(), "identities loaded");
        Ok(identities)
    }

    /// Public key of the most recently added identity.
    ///
    /// Prefers the `# public key:` comment and falls back to deriving it.
    pub fn public_key(&self) -> Result<PublicKey> {
        if !self.path.exists() {
            return Err(KeyError::NoPrivateKey(self.path.display().to_string()).into());
        }
        let contents = fs::read_to_string(&self.path).map_err(KeyError::ReadFailed)?;
        let from_comment = contents
            .lines()
            .filter_map(|line| {
                let line = line.trim();
                line.get(..PUBLIC_KEY_COMMENT.len())
                    .filter(|head| head.eq_ignore_ascii_case(PUBLIC_KEY_COMMENT))
                    .map(|_| line[PUBLIC_KEY_COMMENT.len()..].trim().to_string())
            })
            .last();

        if let Some(key) = from_comment.filter(|k| !k.is_empty()) {
            return Ok(key);
        }

        let identities = self.load_identities()?;
        identities
            .last()
            .map(|id| id.to_public().to_string())
            .ok_or_else(|| KeyError::NoPrivateKey(self.path.display().to_string()).into())
    }

    /// Generate a new identity and append it to the key file.
    ///
    /// Creates the directory (0700) and file (0600) as needed. Existing
    /// identities are kept so older ciphertext stays readable.
    ///
    /// # Returns
    ///
    /// The public key string (starts with "age1...").
    pub fn generate(&self) -> Result<PublicKey> {
        use age::secrecy::ExposeSecret;

        let identity = x25519::Identity::generate();
        let public_key = identity.to_public().to_string();

        if let Some(dir) = self.path.parent() {
            scratch::create_private_dir(dir)?;
        }

        let mut contents = if self.path.exists() {
            fs::read_to_string(&self.path).map_err(KeyError::ReadFailed)?
        } else {
            String::new()
        };
        if !contents.is_empty() && !contents.ends_with('\n') {
            contents.push('\n');
        }
        if !contents.is_empty() {
            contents.push('\n');
        }
        contents.push_str(&format!(
            "# created: {}\n{} {}\n{}\n",
            chrono::Utc::now().to_rfc3339(),
            PUBLIC_KEY_COMMENT,
            public_key,
            identity.to_string().expose_secret()
        ));

        scratch::write_private(&self.path, contents.as_bytes())?;
        debug!(path = %self.path.display(), "identity saved");

        Ok(public_key)
    }
}
