//! The `commit-msg` hook

use super::category::HookCategory;
use super::executor::{HookInput, HookRunner};
use super::loader::HookLoader;
use super::outcome::HookOutcome;
use super::report::Reporter;
use crate::git::Repo;
use crate::timing::Timings;
use quickhook_core::Result;
use std::io::Write;
use std::path::Path;

/// A `commit-msg` invocation bound to one repository
#[derive(Debug, Clone)]
pub struct CommitMsg {
    repo: Repo,
}

impl CommitMsg {
    /// Create a new invocation
    #[must_use]
    pub fn new(repo: Repo) -> Self {
        Self { repo }
    }

    /// Run the `commit-msg` executables in order against `message_file`
    ///
    /// Each executable gets the message file as its only argument and may
    /// rewrite it. The first failure stops the run.
    ///
    /// # Errors
    ///
    /// Returns an error if discovery fails or output cannot be written
    #[tracing::instrument(skip_all, fields(message_file = %message_file.display()))]
    pub fn run<W: Write>(
        &self,
        message_file: &Path,
        reporter: &mut Reporter<W>,
        timings: &Timings,
    ) -> Result<HookOutcome> {
        let root = self.repo.root();
        let executables = HookLoader::new(root).discover(HookCategory::CommitMsg, timings)?;

        let results = HookRunner::new(root, HookCategory::CommitMsg, timings)
            .run(&executables, HookInput::MessageFile(message_file))?;
        reporter.report_all(&results)?;

        Ok(HookOutcome::from_failed(reporter.any_failed()))
    }
}
