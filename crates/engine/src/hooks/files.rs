//! Target file resolution
//!
//! Produces the list of paths that is piped to every pre-commit executable.

use crate::timing::Timings;
use quickhook_config::EmptyFilesPolicy;
use quickhook_core::{GitProvider, Result};
use std::path::Path;

/// Where the target files come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSource {
    /// Supplied by the caller; used verbatim
    Explicit(Vec<String>),
    /// Files staged in the index
    Staged,
    /// Every tracked file
    All,
}

impl FileSource {
    /// Policy to apply when this source yields no files
    ///
    /// Files named by the caller always run; an empty git query falls back
    /// to `configured`.
    #[must_use]
    pub fn empty_policy(&self, configured: EmptyFilesPolicy) -> EmptyFilesPolicy {
        match self {
            Self::Explicit(_) => EmptyFilesPolicy::Run,
            Self::Staged | Self::All => configured,
        }
    }
}

/// Resolve the target files for a run
///
/// Paths from git are kept only if they still exist as non-directories under
/// `root`, so a staged deletion is dropped rather than reported.
///
/// # Errors
///
/// Returns an error if the git query fails
pub fn resolve_files(
    root: &Path,
    git: &dyn GitProvider,
    source: &FileSource,
    timings: &Timings,
) -> Result<Vec<String>> {
    let candidates = match source {
        FileSource::Explicit(files) => return Ok(files.clone()),
        FileSource::Staged => {
            let _span = timings.span("git diff");
            git.staged_files(root)?
        }
        FileSource::All => {
            let _span = timings.span("git ls-files");
            git.tracked_files(root)?
        }
    };

    let total = candidates.len();
    let files: Vec<String> = candidates
        .into_iter()
        .filter(|file| is_file(&root.join(file)))
        .collect();

    if files.len() != total {
        tracing::debug!(
            dropped = total - files.len(),
            "Dropped paths that no longer exist on disk"
        );
    }

    Ok(files)
}

/// Join files into the standard input payload
#[must_use]
pub fn payload(files: &[String]) -> String {
    files.join("\n")
}

fn is_file(path: &Path) -> bool {
    path.metadata().is_ok_and(|metadata| !metadata.is_dir())
}
