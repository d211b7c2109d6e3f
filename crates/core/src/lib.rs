//! Core types and utilities for quickhook
//!
//! This is the foundation crate that all other quickhook crates depend on.
//! It provides:
//! - Base error types
//! - The git capability trait used to resolve target files
//! - Process exit codes shared by the engine and the CLI
//!
//! This crate has no dependencies on other quickhook crates.

pub mod error;
pub mod exit;
pub mod traits;

pub use error::{Error, Result};
pub use traits::GitProvider;
