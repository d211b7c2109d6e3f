//! # Quickhook Engine
//!
//! Core library for the quickhook git hook runner.
//!
//! This crate provides everything between "git invoked a hook" and "here is
//! the exit code":
//!
//! - **Repository**: Locating the working tree and querying git for files
//! - **Discovery**: Finding executables under `.quickhook/<category>/`
//! - **Execution**: Sequential and parallel runs, with git denied to the latter
//! - **Reporting**: Name-prefixed output and the aggregate outcome
//! - **Timing**: Optional span collection for `--trace`

pub mod git;
pub mod hooks;
pub mod timing;

// Re-export error types from core
pub use quickhook_core::{Error, GitProvider, Result};

// Re-export commonly used types
pub use git::{Git2Provider, GitCommandProvider, Repo, create_provider};
pub use hooks::{CommitMsg, FileSource, HookOutcome, PreCommit, PreCommitOptions, Reporter};
pub use timing::Timings;
