//! Git shim for parallel hooks
//!
//! A temporary directory holding a fake `git` that always fails. It is put in
//! front of `PATH` for concurrently run executables only, so they cannot race
//! each other on the index or working tree. The directory is removed when the
//! [`GitShim`] is dropped, whichever way the run ends.

use quickhook_core::{Error, Result};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Command name the shim intercepts
pub const GIT_COMMAND: &str = "git";

const SHIM_SCRIPT: &str = "#!/bin/sh\n\
echo \"git is not allowed in parallel hooks (git $*)\"\n\
exit 1\n";

/// Owner of the temporary shim directory
#[derive(Debug)]
pub struct GitShim {
    dir: TempDir,
}

impl GitShim {
    /// Create the shim directory and its `git` executable
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary directory or script cannot be written
    pub fn new() -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("quickhook-git-shim-")
            .tempdir()
            .map_err(|source| Error::Shim {
                path: std::env::temp_dir(),
                source,
            })?;

        let shim_path = dir.path().join(GIT_COMMAND);
        write_executable(&shim_path, SHIM_SCRIPT).map_err(|source| Error::Shim {
            path: shim_path.clone(),
            source,
        })?;

        tracing::debug!("Created git shim at {}", shim_path.display());
        Ok(Self { dir })
    }

    /// Directory containing the fake `git`
    #[must_use]
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// `PATH` value with the shim directory prepended to `current`
    ///
    /// # Errors
    ///
    /// Returns an error if the shim directory contains the path separator
    pub fn search_path(&self, current: Option<&std::ffi::OsStr>) -> Result<OsString> {
        let mut paths: Vec<PathBuf> = vec![self.dir().to_path_buf()];
        if let Some(current) = current {
            paths.extend(std::env::split_paths(current));
        }

        std::env::join_paths(paths).map_err(|e| Error::Shim {
            path: self.dir().to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, e),
        })
    }

    /// Remove the shim directory now, reporting failures
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be removed
    pub fn remove(self) -> Result<()> {
        let path = self.dir().to_path_buf();
        self.dir
            .close()
            .map_err(|source| Error::Shim { path, source })
    }
}

fn write_executable(path: &Path, content: &str) -> std::io::Result<()> {
    fs::write(path, content)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o755))?;
    }

    Ok(())
}
