//! Error types for CLI commands
//!
//! Structured errors for the cases that need their own exit code; everything
//! else travels as `anyhow::Error` and exits with the generic failure code.

use quickhook_core::exit::{FATAL_EXIT_CODE, NOTHING_STAGED_EXIT_CODE};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during command execution
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum CommandError {
    /// `install` found no `.quickhook` directory
    #[error("Missing hooks directory: {}", .0.display())]
    MissingHooksDirectory(PathBuf),

    /// A git hook name quickhook does not handle
    #[error("Invalid hook: {0}")]
    InvalidHook(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Generic error
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<quickhook_core::Error> for CommandError {
    fn from(err: quickhook_core::Error) -> Self {
        Self::Other(err.into())
    }
}

/// Result type alias for command operations
pub type Result<T> = std::result::Result<T, CommandError>;

impl CommandError {
    /// Process exit code for this error
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::MissingHooksDirectory(_) => NOTHING_STAGED_EXIT_CODE,
            Self::InvalidHook(_) | Self::IoError(_) | Self::Other(_) => FATAL_EXIT_CODE,
        }
    }
}

/// Exit code for any error reaching `main`
#[must_use]
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<CommandError>()
        .map_or(FATAL_EXIT_CODE, CommandError::exit_code)
}
