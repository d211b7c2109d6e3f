//! Configuration management for quickhook
//!
//! This crate handles:
//! - Loading `.quickhook.toml` from the repository root
//! - Policy enums shared by the engine and the CLI
//! - Logging initialization

pub mod config;
pub mod logging;

// Re-export error types from core
pub use quickhook_core::{Error, Result};

// Re-export main types
pub use config::{CONFIG_FILE_NAME, Config, EmptyFilesPolicy, GitBackend, HooksConfig, UiConfig};
