//! Hook discovery
//!
//! Finds hook executables in the `.quickhook/<category>/` directory structure.
//! Executables are rediscovered on every run.

use super::category::HookCategory;
use crate::timing::Timings;
use quickhook_core::{Error, Result};
use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Directory under the repository root holding the category directories
pub const HOOKS_DIR: &str = ".quickhook";

/// A discovered hook executable, identified by its root-relative path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Executable {
    relative_path: PathBuf,
}

impl Executable {
    /// Wrap a path relative to the repository root
    #[must_use]
    pub fn new(relative_path: impl Into<PathBuf>) -> Self {
        Self {
            relative_path: relative_path.into(),
        }
    }

    /// Path relative to the repository root, e.g. `.quickhook/pre-commit/lint`
    #[must_use]
    pub fn relative_path(&self) -> &Path {
        &self.relative_path
    }

    /// Base name used to prefix the executable's output
    #[must_use]
    pub fn name(&self) -> Cow<'_, str> {
        self.relative_path
            .file_name()
            .map_or(Cow::Borrowed(""), |n| n.to_string_lossy())
    }

    /// Full path to spawn
    #[must_use]
    pub fn absolute_path(&self, root: &Path) -> PathBuf {
        root.join(&self.relative_path)
    }
}

/// Discover hook executables below a repository root
#[derive(Debug, Clone)]
pub struct HookLoader {
    root: PathBuf,
    hooks_dir: PathBuf,
}

impl HookLoader {
    /// Create a new hook loader for the given repository root
    #[must_use]
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            hooks_dir: root.join(HOOKS_DIR),
        }
    }

    /// Check if the `.quickhook` directory exists
    #[must_use]
    pub fn exists(&self) -> bool {
        self.hooks_dir.is_dir()
    }

    /// Absolute path of the `.quickhook` directory
    #[must_use]
    pub fn hooks_dir(&self) -> &Path {
        &self.hooks_dir
    }

    /// Find the executables for one category
    ///
    /// A missing category directory yields an empty list. Subdirectories are
    /// skipped silently; files without any execute bit are skipped with a
    /// warning. Results are sorted by file name.
    ///
    /// # Errors
    ///
    /// Returns an error for any I/O failure other than the directory not existing
    pub fn discover(&self, category: HookCategory, timings: &Timings) -> Result<Vec<Executable>> {
        let _span = timings.span(format!("find {category}"));

        let relative_dir = Path::new(HOOKS_DIR).join(category.dir_name());
        let dir = self.root.join(&relative_dir);

        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("Hook directory does not exist: {}", dir.display());
                return Ok(Vec::new());
            }
            Err(source) => return Err(Error::DirectoryRead { path: dir, source }),
        };

        let read_err = |source| Error::DirectoryRead {
            path: dir.clone(),
            source,
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(read_err)?;
            let path = entry.path();

            // Follow symlinks so a linked script is judged by its target
            let metadata = match fs::metadata(&path) {
                Ok(metadata) => metadata,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    tracing::warn!(
                        "Skipping broken link in {}: {}",
                        relative_dir.display(),
                        entry.file_name().to_string_lossy()
                    );
                    continue;
                }
                Err(source) => return Err(read_err(source)),
            };

            if metadata.is_dir() {
                continue;
            }

            if is_executable(&metadata) {
                names.push(entry.file_name());
            } else {
                tracing::warn!(
                    "Non-executable file found in {}: {}",
                    relative_dir.display(),
                    entry.file_name().to_string_lossy()
                );
            }
        }

        names.sort();

        let executables: Vec<Executable> = names
            .into_iter()
            .map(|name| Executable::new(relative_dir.join(name)))
            .collect();

        tracing::debug!(
            category = %category,
            count = executables.len(),
            "Discovered hook executables"
        );

        Ok(executables)
    }

    /// Categories that have a directory under `.quickhook/`
    ///
    /// # Errors
    ///
    /// Returns an error if `.quickhook/` cannot be read, including when it is missing
    pub fn categories(&self) -> Result<Vec<HookCategory>> {
        let entries = fs::read_dir(&self.hooks_dir).map_err(|source| Error::DirectoryRead {
            path: self.hooks_dir.clone(),
            source,
        })?;

        let mut present = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| Error::DirectoryRead {
                path: self.hooks_dir.clone(),
                source,
            })?;
            if !entry.path().is_dir() {
                continue;
            }
            if let Some(category) = entry
                .file_name()
                .to_str()
                .and_then(|name| name.parse::<HookCategory>().ok())
            {
                present.push(category);
            }
        }

        // Keep a stable order regardless of directory iteration
        present.sort_by_key(|category| {
            HookCategory::ALL
                .iter()
                .position(|c| c == category)
                .unwrap_or(usize::MAX)
        });
        Ok(present)
    }
}

#[cfg(unix)]
fn is_executable(metadata: &fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(metadata: &fs::Metadata) -> bool {
    metadata.is_file()
}
