//! Git operations abstraction layer
//!
//! This module provides the repository handle and the two implementations of
//! [`GitProvider`]:
//! - Built-in git via git2 (libgit2) - default
//! - External git command - when explicitly configured
//!
//! Only the file-set resolver gets a provider. Hook executables that run in
//! parallel never see one.

use quickhook_config::GitBackend;
use quickhook_core::{Error, GitProvider, Result};
use std::path::{Path, PathBuf};

/// Helper function to convert git2 errors to `quickhook_core` errors
#[inline]
#[allow(clippy::needless_pass_by_value)]
fn git_err(e: git2::Error) -> Error {
    Error::Git(e.message().to_string())
}

/// Root of the repository the hooks run in
///
/// Resolved once at startup and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repo {
    root: PathBuf,
    git_dir: PathBuf,
}

impl Repo {
    /// Find the repository containing `start_path`
    ///
    /// # Errors
    ///
    /// Returns an error if `start_path` is not inside a git working tree
    pub fn discover(start_path: &Path) -> Result<Self> {
        let repo = git2::Repository::discover(start_path)
            .map_err(|_| Error::NotARepository(start_path.to_path_buf()))?;
        Self::from_repository(&repo, start_path)
    }

    /// Open the repository git is running the hook for
    ///
    /// Honors `GIT_DIR`/`GIT_WORK_TREE` when git sets them, otherwise discovers
    /// from the current directory.
    ///
    /// # Errors
    ///
    /// Returns an error if no working tree can be found
    pub fn from_env() -> Result<Self> {
        let cwd = std::env::current_dir()?;
        let repo =
            git2::Repository::open_from_env().map_err(|_| Error::NotARepository(cwd.clone()))?;
        Self::from_repository(&repo, &cwd)
    }

    fn from_repository(repo: &git2::Repository, start_path: &Path) -> Result<Self> {
        let workdir = repo
            .workdir()
            .ok_or_else(|| Error::NotARepository(start_path.to_path_buf()))?;

        // git2 reports the workdir with a trailing separator
        let root: PathBuf = workdir.components().collect();
        let git_dir: PathBuf = repo.path().components().collect();

        tracing::debug!("Repository root: {}", root.display());
        Ok(Self { root, git_dir })
    }

    /// Working tree root
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory git looks in for hook scripts
    #[must_use]
    pub fn hooks_dir(&self) -> PathBuf {
        self.git_dir.join("hooks")
    }
}

/// Open the index git is committing from
///
/// `git commit -a` and `git commit <paths>` stage into a temporary index and
/// point hooks at it through `GIT_INDEX_FILE`.
fn open_index(repo: &git2::Repository, root: &Path) -> Result<git2::Index> {
    match std::env::var_os("GIT_INDEX_FILE") {
        Some(index_file) => {
            let path = root.join(index_file);
            tracing::debug!("Using index from GIT_INDEX_FILE: {}", path.display());
            git2::Index::open(&path).map_err(git_err)
        }
        None => repo.index().map_err(git_err),
    }
}

/// Git provider implementation using git2 (libgit2)
#[derive(Debug, Clone, Copy, Default)]
pub struct Git2Provider;

impl Git2Provider {
    /// Create a new Git2 provider
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl GitProvider for Git2Provider {
    fn staged_files(&self, root: &Path) -> Result<Vec<String>> {
        let repo = git2::Repository::open(root).map_err(git_err)?;
        let index = open_index(&repo, root)?;

        // An unborn branch has no HEAD tree: everything in the index is staged
        let head_tree = match repo.head() {
            Ok(head) => Some(head.peel_to_tree().map_err(git_err)?),
            Err(e)
                if e.code() == git2::ErrorCode::UnbornBranch
                    || e.code() == git2::ErrorCode::NotFound =>
            {
                None
            }
            Err(e) => return Err(git_err(e)),
        };

        let diff = repo
            .diff_tree_to_index(head_tree.as_ref(), Some(&index), None)
            .map_err(git_err)?;

        Ok(diff
            .deltas()
            .filter_map(|delta| {
                delta
                    .new_file()
                    .path()
                    .map(|p| p.to_string_lossy().into_owned())
            })
            .collect())
    }

    fn tracked_files(&self, root: &Path) -> Result<Vec<String>> {
        let repo = git2::Repository::open(root).map_err(git_err)?;
        let index = open_index(&repo, root)?;

        let mut files: Vec<String> = index
            .iter()
            .map(|entry| String::from_utf8_lossy(&entry.path).into_owned())
            .collect();
        // Conflicted paths appear once per stage
        files.dedup();

        Ok(files)
    }
}

/// Git provider implementation shelling out to the `git` executable
#[derive(Debug, Clone, Copy, Default)]
pub struct GitCommandProvider;

impl GitCommandProvider {
    /// Create a new command-based provider
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Run `git <args> -z` in `root` and split the NUL-separated output
    fn lines(root: &Path, args: &[&str]) -> Result<Vec<String>> {
        let output = duct::cmd("git", args.iter().chain(&["-z"]))
            .dir(root)
            .stdout_capture()
            .stderr_capture()
            .unchecked()
            .run()
            .map_err(|e| Error::Git(format!("Failed to run git {}: {e}", args.join(" "))))?;

        if !output.status.success() {
            return Err(Error::Git(format!(
                "git {} failed: {}",
                args.join(" "),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(output
            .stdout
            .split(|b| *b == 0)
            .filter(|line| !line.is_empty())
            .map(|line| String::from_utf8_lossy(line).into_owned())
            .collect())
    }
}

impl GitProvider for GitCommandProvider {
    fn staged_files(&self, root: &Path) -> Result<Vec<String>> {
        Self::lines(root, &["diff", "--name-only", "--cached"])
    }

    fn tracked_files(&self, root: &Path) -> Result<Vec<String>> {
        Self::lines(root, &["ls-files"])
    }
}

/// Create the git provider selected by configuration
#[must_use]
pub fn create_provider(backend: GitBackend) -> Box<dyn GitProvider> {
    match backend {
        GitBackend::Builtin => Box::new(Git2Provider::new()),
        GitBackend::Command => Box::new(GitCommandProvider::new()),
    }
}
