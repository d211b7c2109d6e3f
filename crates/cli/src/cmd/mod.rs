//! CLI command implementations
//!
//! This module contains all command implementations for the quickhook CLI.

pub mod hook;
pub mod install;
