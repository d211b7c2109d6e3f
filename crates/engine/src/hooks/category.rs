//! Hook categories
//!
//! Each category is a subdirectory of `.quickhook/` with its own execution
//! policy.

use std::fmt;
use std::str::FromStr;

/// How the executables of a category are run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionPolicy {
    /// One at a time in discovery order, stopping at the first failure
    Sequential,
    /// All at once on a bounded pool, every result collected
    Concurrent,
}

/// A convention-named hook phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookCategory {
    /// Read-only checks, run in parallel without access to git
    PreCommit,
    /// Fixers such as formatters, run one by one before the checks
    PreCommitMutating,
    /// Commit message checks, given the message file as their argument
    CommitMsg,
}

impl HookCategory {
    /// All categories, in the order a commit runs them
    pub const ALL: [Self; 3] = [Self::PreCommitMutating, Self::PreCommit, Self::CommitMsg];

    /// Name of the discovery directory under `.quickhook/`
    #[must_use]
    pub const fn dir_name(self) -> &'static str {
        match self {
            Self::PreCommit => "pre-commit",
            Self::PreCommitMutating => "pre-commit-mutating",
            Self::CommitMsg => "commit-msg",
        }
    }

    /// The git hook that triggers this category
    ///
    /// Mutating executables run as part of git's `pre-commit` hook.
    #[must_use]
    pub const fn git_hook(self) -> &'static str {
        match self {
            Self::PreCommit | Self::PreCommitMutating => "pre-commit",
            Self::CommitMsg => "commit-msg",
        }
    }

    /// Sequential or concurrent execution
    #[must_use]
    pub const fn policy(self) -> ExecutionPolicy {
        match self {
            Self::PreCommit => ExecutionPolicy::Concurrent,
            Self::PreCommitMutating | Self::CommitMsg => ExecutionPolicy::Sequential,
        }
    }

    /// Whether executables get the shim in front of the real git
    #[must_use]
    pub const fn denies_git(self) -> bool {
        matches!(self, Self::PreCommit)
    }
}

impl fmt::Display for HookCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

impl FromStr for HookCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.dir_name() == s)
            .ok_or_else(|| format!("unknown hook category: {s}"))
    }
}
