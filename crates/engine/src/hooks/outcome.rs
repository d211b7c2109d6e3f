//! Aggregate result of one hook invocation

use quickhook_core::exit::{FAILED_EXIT_CODE, NOTHING_STAGED_EXIT_CODE};

/// How a whole invocation ended
///
/// Only infrastructure problems are errors; failing hooks end up here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookOutcome {
    /// Every executable that ran exited zero
    Passed,
    /// At least one executable failed
    Failed,
    /// The resolved file set was empty and the hooks were skipped
    NothingToCheck,
}

impl HookOutcome {
    /// Process exit code for this outcome
    #[must_use]
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::Passed => 0,
            Self::Failed => FAILED_EXIT_CODE,
            Self::NothingToCheck => NOTHING_STAGED_EXIT_CODE,
        }
    }

    /// Outcome for a reporter's failure flag
    #[must_use]
    pub const fn from_failed(failed: bool) -> Self {
        if failed { Self::Failed } else { Self::Passed }
    }
}
