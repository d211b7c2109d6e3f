//! Process exit codes
//!
//! Values follow `sysexits.h` so shell callers can tell the cases apart.

/// At least one hook executable failed (`EX_DATAERR`)
pub const FAILED_EXIT_CODE: i32 = 65;

/// There was nothing to check, e.g. no staged files (`EX_NOINPUT`)
pub const NOTHING_STAGED_EXIT_CODE: i32 = 66;

/// Infrastructure failure: not a repository, unreadable directory, etc.
pub const FATAL_EXIT_CODE: i32 = 1;
