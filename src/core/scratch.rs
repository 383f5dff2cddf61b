//! Scoped temporary storage.
//!
//! Plaintext and intermediate ciphertext only ever touch disk inside a
//! [`Scratch`] directory. The directory is removed when the value is dropped,
//! on every exit path including `?` returns and unwinding panics.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::trace;

use crate::core::constants;
use crate::error::Result;

/// An owner-only temporary directory, deleted on drop.
#[derive(Debug)]
pub struct Scratch {
    dir: TempDir,
}

impl Scratch {
    /// Create a fresh scratch directory under `root`.
    pub fn new_in(root: &Path) -> Result<Self> {
        fs::create_dir_all(root)?;
        let dir = tempfile::Builder::new()
            .prefix(constants::SCRATCH_PREFIX)
            .tempdir_in(root)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(dir.path(), fs::Permissions::from_mode(0o700))?;
        }

        trace!(path = %dir.path().display(), "scratch created");
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path for a file named `name` inside the scratch directory.
    pub fn file(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Write `contents` to `name` with owner-only permissions.
    pub fn write(&self, name: &str, contents: &[u8]) -> Result<PathBuf> {
        let path = self.file(name);
        write_private(&path, contents)?;
        Ok(path)
    }
}

impl Drop for Scratch {
    fn drop(&mut self) {
        trace!(path = %self.dir.path().display(), "scratch released");
    }
}

/// Write a file readable only by its owner (0600 on Unix).
///
/// Permissions are reset even when overwriting an existing file.
pub fn write_private(path: &Path, contents: &[u8]) -> Result<()> {
    #[cfg(unix)]
    {
        use std::io::Write;
        use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

        let mut file = fs::OpenOptions::new()
            .create(true)
            .truncate(true)
            .write(true)
            .mode(0o600)
            .open(path)?;
        file.write_all(contents)?;
        file.flush()?;

        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }

    #[cfg(not(unix))]
    {
        fs::write(path, contents)?;
    }

    Ok(())
}

/// Create a directory (and parents) readable only by its owner.
pub fn create_private_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o700))?;
    }

    Ok(())
}
