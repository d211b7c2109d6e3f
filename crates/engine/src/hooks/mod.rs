//! Hook execution engine
//!
//! Discovers executables under `.quickhook/<category>/`, resolves the target
//! files, and runs everything according to the category's policy.
//!
//! ## Execution Model
//!
//! - `pre-commit-mutating` executables run one at a time and may use git
//! - `pre-commit` executables run **in parallel** with a fake `git` first on `PATH`
//! - `commit-msg` executables run one at a time with the message file as argument
//! - Sequential phases stop at the first failure; the parallel phase always
//!   lets every executable finish
//!
//! ## Module Organization
//!
//! - `category`: Hook categories and their execution policies
//! - `loader`: Executable discovery from the filesystem
//! - `files`: Target file resolution
//! - `shim`: The temporary git-denying shim
//! - `executor`: Process spawning, sequential and parallel
//! - `report`: Prefixed output and failure tracking
//! - `pre_commit` / `commit_msg`: The two git hooks, end to end

pub mod category;
pub mod commit_msg;
pub mod executor;
pub mod files;
pub mod loader;
pub mod outcome;
pub mod pre_commit;
pub mod report;
pub mod shim;

// Re-export main types for convenience
pub use category::{ExecutionPolicy, HookCategory};
pub use commit_msg::CommitMsg;
pub use executor::{ExecutionResult, HookInput, HookRunner, HookRunnerBuilder, HookStatus};
pub use files::{FileSource, resolve_files};
pub use loader::{Executable, HOOKS_DIR, HookLoader};
pub use outcome::HookOutcome;
pub use pre_commit::{NOTHING_STAGED_MESSAGE, PreCommit, PreCommitOptions};
pub use report::Reporter;
pub use shim::GitShim;
