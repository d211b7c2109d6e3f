//! The `pre-commit` hook
//!
//! Runs `pre-commit-mutating` executables one at a time with full access to
//! git, then `pre-commit` executables in parallel behind the git shim. Both
//! receive the target file list on stdin.

use super::category::HookCategory;
use super::executor::{ExecutionResult, HookInput, HookRunner};
use super::files::{FileSource, payload, resolve_files};
use super::loader::{Executable, HookLoader};
use super::outcome::HookOutcome;
use super::report::Reporter;
use super::shim::GitShim;
use crate::git::Repo;
use crate::timing::Timings;
use quickhook_config::EmptyFilesPolicy;
use quickhook_core::{GitProvider, Result};
use std::io::Write;

/// Printed when git resolves no files and the hooks are skipped
pub const NOTHING_STAGED_MESSAGE: &str = "No files to be committed!";

/// Knobs for one `pre-commit` run
#[derive(Debug, Clone)]
pub struct PreCommitOptions {
    /// Where the target files come from
    pub files: FileSource,
    /// Policy for an empty file set resolved from git
    pub on_empty: EmptyFilesPolicy,
    /// Upper bound on concurrently running executables
    pub parallelism: usize,
}

impl Default for PreCommitOptions {
    fn default() -> Self {
        Self {
            files: FileSource::Staged,
            on_empty: EmptyFilesPolicy::default(),
            parallelism: std::thread::available_parallelism()
                .map_or(1, std::num::NonZeroUsize::get),
        }
    }
}

/// A `pre-commit` invocation bound to one repository
pub struct PreCommit {
    repo: Repo,
    provider: Box<dyn GitProvider>,
    options: PreCommitOptions,
}

impl PreCommit {
    /// Create a new invocation
    pub fn new(repo: Repo, provider: Box<dyn GitProvider>, options: PreCommitOptions) -> Self {
        Self {
            repo,
            provider,
            options,
        }
    }

    /// Run both pre-commit categories and report their output
    ///
    /// # Errors
    ///
    /// Returns an error if discovery, file resolution or shim construction
    /// fails, or if output cannot be written. Failing executables are not
    /// errors; they yield [`HookOutcome::Failed`].
    #[tracing::instrument(skip_all, fields(root = %self.repo.root().display()))]
    pub fn run<W: Write>(
        &self,
        reporter: &mut Reporter<W>,
        timings: &Timings,
    ) -> Result<HookOutcome> {
        let root = self.repo.root();
        let loader = HookLoader::new(root);

        let ((mutating, parallel), (files, shim)) = rayon::join(
            || {
                rayon::join(
                    || loader.discover(HookCategory::PreCommitMutating, timings),
                    || loader.discover(HookCategory::PreCommit, timings),
                )
            },
            || {
                rayon::join(
                    || resolve_files(root, self.provider.as_ref(), &self.options.files, timings),
                    GitShim::new,
                )
            },
        );
        // The shim is dropped, and its directory removed, on every early return
        let shim = shim?;
        let (mutating, parallel, files) = (mutating?, parallel?, files?);

        tracing::debug!(
            files = files.len(),
            mutating = mutating.len(),
            parallel = parallel.len(),
            "Resolved pre-commit inputs"
        );

        if files.is_empty() {
            match self.options.files.empty_policy(self.options.on_empty) {
                EmptyFilesPolicy::Skip => {
                    reporter.notice(NOTHING_STAGED_MESSAGE)?;
                    return Ok(HookOutcome::NothingToCheck);
                }
                EmptyFilesPolicy::Succeed => {
                    tracing::debug!("No files to check, skipping hooks");
                    return Ok(HookOutcome::Passed);
                }
                EmptyFilesPolicy::Run => {}
            }
        }

        let payload = payload(&files);
        let input = HookInput::Files(&payload);

        for (category, executables) in [
            (HookCategory::PreCommitMutating, &mutating),
            (HookCategory::PreCommit, &parallel),
        ] {
            let results = self.run_category(category, executables, input, &shim, timings)?;
            reporter.report_all(&results)?;
            if reporter.any_failed() {
                return Ok(HookOutcome::Failed);
            }
        }

        if let Err(e) = shim.remove() {
            tracing::warn!("{e}");
        }

        Ok(HookOutcome::Passed)
    }

    /// Run one category the way its policy says, behind the shim if it denies git
    fn run_category(
        &self,
        category: HookCategory,
        executables: &[Executable],
        input: HookInput<'_>,
        shim: &GitShim,
        timings: &Timings,
    ) -> Result<Vec<ExecutionResult>> {
        let mut builder = HookRunner::builder(self.repo.root(), category, timings)
            .parallelism(self.options.parallelism);
        if category.denies_git() {
            builder = builder.search_path(shim.search_path(std::env::var_os("PATH").as_deref())?);
        }
        builder.build().run(executables, input)
    }
}
