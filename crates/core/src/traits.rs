//! Core behavioral traits for quickhook components
//!
//! The hook engine never talks to git directly. Whatever needs repository
//! state receives a [`GitProvider`], and the parts that run concurrent hook
//! executables are never handed one.

use crate::Result;
use std::path::Path;

/// Read-only git queries needed to resolve the files a hook runs against
///
/// # Examples
///
/// ```ignore
/// fn staged_count(git: &dyn GitProvider, root: &Path) -> Result<usize> {
///     Ok(git.staged_files(root)?.len())
/// }
/// ```
pub trait GitProvider: Send + Sync {
    /// Paths staged in the index, relative to the repository root
    fn staged_files(&self, root: &Path) -> Result<Vec<String>>;

    /// Every path tracked by the index, relative to the repository root
    fn tracked_files(&self, root: &Path) -> Result<Vec<String>>;
}
