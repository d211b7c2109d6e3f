//! Base error types for quickhook
//!
//! Infrastructure failures only. A hook executable exiting non-zero is not an
//! error: it is captured as a result and decides the outcome of the run.

use std::path::PathBuf;
use thiserror::Error;

/// Base error type for shared functionality
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error reading a hook directory
    #[error("Failed to read directory {}: {source}", path.display())]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Not inside a git working tree
    #[error("Not a git repository (or no working tree): {}", .0.display())]
    NotARepository(PathBuf),

    /// Git query failed
    #[error("Git error: {0}")]
    Git(String),

    /// Failed to build the temporary git shim
    #[error("Failed to create git shim in {}: {source}", path.display())]
    Shim {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The worker pool itself failed (not a hook executable)
    #[error("Hook dispatch failed: {0}")]
    Dispatch(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error message
    #[error("{0}")]
    Message(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
