//! Configuration management
//!
//! This module handles loading quickhook configuration from the repository.
//! The file is optional; a repository without `.quickhook.toml` runs with defaults.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::num::NonZeroUsize;
use std::path::Path;
use std::str::FromStr;

/// Name of the optional configuration file at the repository root
pub const CONFIG_FILE_NAME: &str = ".quickhook.toml";

/// What to do when the file set resolved from git is empty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EmptyFilesPolicy {
    /// Skip the hooks and report "nothing to check" with its own exit code
    #[default]
    Skip,
    /// Skip the hooks and report success
    Succeed,
    /// Run the hooks anyway with an empty payload
    Run,
}

impl FromStr for EmptyFilesPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "skip" => Ok(Self::Skip),
            "succeed" | "pass" => Ok(Self::Succeed),
            "run" => Ok(Self::Run),
            other => Err(format!(
                "invalid empty-files policy '{other}' (expected skip, succeed or run)"
            )),
        }
    }
}

impl fmt::Display for EmptyFilesPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Skip => "skip",
            Self::Succeed => "succeed",
            Self::Run => "run",
        };
        f.write_str(name)
    }
}

/// Which git implementation answers repository queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GitBackend {
    /// Built-in git via git2 (libgit2)
    #[default]
    Builtin,
    /// External `git` executable on PATH
    Command,
}

/// Hook execution configuration section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HooksConfig {
    /// Policy for an empty file set resolved from git
    #[serde(default)]
    pub on_empty: EmptyFilesPolicy,

    /// Upper bound on concurrently running pre-commit executables
    ///
    /// Defaults to the available hardware parallelism.
    #[serde(default)]
    pub parallelism: Option<NonZeroUsize>,

    /// Git implementation used to list staged and tracked files
    #[serde(default)]
    pub git: GitBackend,
}

impl HooksConfig {
    /// Resolve the worker bound, falling back to the hardware parallelism
    #[must_use]
    pub fn effective_parallelism(&self) -> usize {
        self.parallelism
            .or_else(|| std::thread::available_parallelism().ok())
            .map_or(1, NonZeroUsize::get)
    }
}

/// Output configuration section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UiConfig {
    /// Enable colored output
    #[serde(default = "default_color")]
    pub color: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            color: default_color(),
        }
    }
}

fn default_color() -> bool {
    true
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Hook execution settings
    #[serde(default)]
    pub hooks: HooksConfig,

    /// Output settings
    #[serde(default)]
    pub ui: UiConfig,
}

impl Config {
    /// Load configuration from a file
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or TOML parsing fails
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            quickhook_core::Error::Config(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;

        toml::from_str(&content).map_err(|e| {
            quickhook_core::Error::Config(format!(
                "Failed to parse config file {}: {e}",
                path.display()
            ))
        })
    }

    /// Load configuration from TOML string
    ///
    /// # Errors
    ///
    /// Returns error if TOML parsing fails
    pub fn from_toml_str(toml_content: &str) -> Result<Self> {
        toml::from_str(toml_content).map_err(|e| {
            quickhook_core::Error::Config(format!("Failed to parse config TOML: {e}"))
        })
    }

    /// Load `.quickhook.toml` from the repository root, or defaults if it is absent
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load_from_root(root: &Path) -> Result<Self> {
        let config_path = root.join(CONFIG_FILE_NAME);

        if !config_path.is_file() {
            tracing::debug!("No {} found, using defaults", CONFIG_FILE_NAME);
            return Ok(Self::default());
        }

        tracing::debug!("Loading config from {}", config_path.display());
        Self::load(&config_path)
    }
}
