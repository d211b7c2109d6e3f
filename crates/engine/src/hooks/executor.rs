//! Hook execution engine
//!
//! Runs discovered executables with the repository root as working directory,
//! capturing stdout and stderr separately. Sequential categories stop at the
//! first failure; concurrent categories run on a bounded rayon pool and every
//! result is collected before returning.

use super::category::{ExecutionPolicy, HookCategory};
use super::loader::Executable;
use crate::timing::Timings;
use quickhook_core::{Error, Result};
use std::ffi::OsString;
use std::path::Path;

/// What an executable receives
#[derive(Debug, Clone, Copy)]
pub enum HookInput<'a> {
    /// Newline-joined target files on stdin, no arguments
    Files(&'a str),
    /// Commit message file as the only argument, nothing on stdin
    MessageFile(&'a Path),
}

/// How an executable finished
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookStatus {
    /// Exited zero
    Passed,
    /// Exited non-zero; `None` when killed by a signal
    Failed {
        /// Exit code, if any
        code: Option<i32>,
    },
    /// Could not be spawned at all
    LaunchFailed(String),
}

/// Captured outcome of one executable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Which executable ran
    pub executable: Executable,
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
    /// Exit status
    pub status: HookStatus,
}

impl ExecutionResult {
    /// Whether the executable exited zero
    #[must_use]
    pub fn passed(&self) -> bool {
        matches!(self.status, HookStatus::Passed)
    }
}

/// Runs the executables of one category
///
/// The runner only knows the root, the input and an optional `PATH`. It never
/// holds a git provider, so nothing it spawns can be handed one.
#[derive(Debug)]
pub struct HookRunner<'a> {
    root: &'a Path,
    category: HookCategory,
    search_path: Option<OsString>,
    parallelism: usize,
    timings: &'a Timings,
}

impl<'a> HookRunner<'a> {
    /// Create a runner with default settings
    ///
    /// For a `PATH` override or a custom pool size, use [`HookRunner::builder`].
    pub fn new(root: &'a Path, category: HookCategory, timings: &'a Timings) -> Self {
        Self::builder(root, category, timings).build()
    }

    /// Create a builder for configuring a `HookRunner`
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let runner = HookRunner::builder(repo.root(), HookCategory::PreCommit, &timings)
    ///     .search_path(shim.search_path(std::env::var_os("PATH").as_deref())?)
    ///     .parallelism(4)
    ///     .build();
    /// let results = runner.run(&executables, HookInput::Files(&payload))?;
    /// ```
    pub fn builder(
        root: &'a Path,
        category: HookCategory,
        timings: &'a Timings,
    ) -> HookRunnerBuilder<'a> {
        HookRunnerBuilder::new(root, category, timings)
    }

    /// Run executables according to the category's policy
    ///
    /// # Errors
    ///
    /// Returns an error only if the worker pool cannot be built
    pub fn run(
        &self,
        executables: &[Executable],
        input: HookInput<'_>,
    ) -> Result<Vec<ExecutionResult>> {
        match self.category.policy() {
            ExecutionPolicy::Sequential => Ok(self.run_sequential(executables, input)),
            ExecutionPolicy::Concurrent => self.run_concurrent(executables, input),
        }
    }

    /// Run one at a time in order, stopping after the first failure
    ///
    /// The returned results end with the failing one, if any; executables after
    /// it are never started.
    #[tracing::instrument(skip_all, fields(category = %self.category, count = executables.len()))]
    pub fn run_sequential(
        &self,
        executables: &[Executable],
        input: HookInput<'_>,
    ) -> Vec<ExecutionResult> {
        let mut results = Vec::with_capacity(executables.len());

        for executable in executables {
            let result = self.execute(executable, input);
            let passed = result.passed();
            results.push(result);

            if !passed {
                tracing::debug!(
                    skipped = executables.len() - results.len(),
                    "Stopping after failed executable"
                );
                break;
            }
        }

        results
    }

    /// Run all executables on a pool bounded by the configured parallelism
    ///
    /// Results come back in discovery order. A failing executable does not
    /// stop the others.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Dispatch`] if the worker pool cannot be built
    #[tracing::instrument(skip_all, fields(category = %self.category, count = executables.len()))]
    pub fn run_concurrent(
        &self,
        executables: &[Executable],
        input: HookInput<'_>,
    ) -> Result<Vec<ExecutionResult>> {
        use rayon::prelude::*;

        if executables.is_empty() {
            return Ok(Vec::new());
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.parallelism.min(executables.len()))
            .thread_name(|i| format!("quickhook-worker-{i}"))
            .build()
            .map_err(|e| Error::Dispatch(e.to_string()))?;

        tracing::debug!(
            threads = pool.current_num_threads(),
            "Executing hooks in parallel"
        );

        Ok(pool.install(|| {
            executables
                .par_iter()
                .map(|executable| self.execute(executable, input))
                .collect()
        }))
    }

    /// Spawn one executable and wait for it
    ///
    /// A spawn failure becomes [`HookStatus::LaunchFailed`], not an error.
    fn execute(&self, executable: &Executable, input: HookInput<'_>) -> ExecutionResult {
        let name = executable.name();
        let _span = self
            .timings
            .span(format!("hook {} {}", self.category, name));

        let program = executable.absolute_path(self.root);
        tracing::debug!("Executing: {}", program.display());

        let mut expression = match input {
            HookInput::Files(payload) => {
                duct::cmd(&program, std::iter::empty::<OsString>()).stdin_bytes(payload)
            }
            HookInput::MessageFile(message_file) => {
                duct::cmd(&program, [message_file]).stdin_null()
            }
        };

        expression = expression
            .dir(self.root)
            .stdout_capture()
            .stderr_capture()
            .unchecked();

        if let Some(search_path) = &self.search_path {
            expression = expression.env("PATH", search_path);
        }

        let start = std::time::Instant::now();
        let result = match expression.run() {
            Ok(output) => ExecutionResult {
                executable: executable.clone(),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                status: if output.status.success() {
                    HookStatus::Passed
                } else {
                    HookStatus::Failed {
                        code: output.status.code(),
                    }
                },
            },
            Err(e) => {
                tracing::debug!(error = %e, "Failed to launch {}", program.display());
                ExecutionResult {
                    executable: executable.clone(),
                    stdout: String::new(),
                    stderr: format!("failed to run {}: {e}", program.display()),
                    status: HookStatus::LaunchFailed(e.to_string()),
                }
            }
        };

        tracing::debug!(
            hook = %name,
            elapsed_ms = start.elapsed().as_millis(),
            status = ?result.status,
            "Hook finished"
        );

        result
    }
}

// ======================================================================
// HookRunnerBuilder
// ======================================================================

/// Builder for creating a `HookRunner` with custom configuration
pub struct HookRunnerBuilder<'a> {
    root: &'a Path,
    category: HookCategory,
    search_path: Option<OsString>,
    parallelism: Option<usize>,
    timings: &'a Timings,
}

impl<'a> HookRunnerBuilder<'a> {
    /// Create a new builder with required parameters
    ///
    /// This is typically called via [`HookRunner::builder`].
    pub fn new(root: &'a Path, category: HookCategory, timings: &'a Timings) -> Self {
        Self {
            root,
            category,
            search_path: None,
            parallelism: None,
            timings,
        }
    }

    /// Replace `PATH` for every spawned executable
    #[must_use]
    pub fn search_path(mut self, search_path: OsString) -> Self {
        self.search_path = Some(search_path);
        self
    }

    /// Bound the number of concurrently running executables
    ///
    /// Zero is treated as one.
    #[must_use]
    pub fn parallelism(mut self, parallelism: usize) -> Self {
        self.parallelism = Some(parallelism.max(1));
        self
    }

    /// Build the `HookRunner`
    pub fn build(self) -> HookRunner<'a> {
        let parallelism = self.parallelism.unwrap_or_else(|| {
            std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get)
        });

        HookRunner {
            root: self.root,
            category: self.category,
            search_path: self.search_path,
            parallelism,
            timings: self.timings,
        }
    }
}
