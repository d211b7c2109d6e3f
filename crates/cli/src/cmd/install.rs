//! Install command
//!
//! Writes small shell shims into the repository's git hooks directory that
//! call back into quickhook.

use anyhow::Context;
use owo_colors::OwoColorize;
use quickhook_engine::Repo;
use quickhook_engine::hooks::{HookCategory, HookLoader};
use std::fs;
use std::io::{IsTerminal, Write};
use std::path::{Path, PathBuf};

use crate::error::{CommandError, Result};

/// Git hooks quickhook can install shims for
const INSTALLABLE_HOOKS: [&str; 2] = ["pre-commit", "commit-msg"];

/// Git hooks backed by a `.quickhook/` category directory, without duplicates
///
/// # Errors
///
/// Returns [`CommandError::MissingHooksDirectory`] if `.quickhook/` does not exist
pub fn list_hooks(root: &Path) -> Result<Vec<&'static str>> {
    let loader = HookLoader::new(root);
    if !loader.exists() {
        return Err(CommandError::MissingHooksDirectory(
            loader.hooks_dir().to_path_buf(),
        ));
    }

    let mut hooks = Vec::new();
    for category in loader.categories()? {
        let hook = category.git_hook();
        if INSTALLABLE_HOOKS.contains(&hook) && !hooks.contains(&hook) {
            hooks.push(hook);
        }
    }
    Ok(hooks)
}

/// Content of the shim for `hook`
///
/// # Errors
///
/// Returns [`CommandError::InvalidHook`] for hooks quickhook does not run
pub fn shim_content(bin: &str, hook: &str) -> Result<String> {
    let command = match hook {
        "pre-commit" => format!("{bin} hook {}", HookCategory::PreCommit.git_hook()),
        "commit-msg" => format!("{bin} hook {} $1", HookCategory::CommitMsg.git_hook()),
        other => return Err(CommandError::InvalidHook(other.to_string())),
    };
    Ok(format!("#!/bin/sh\n{command}\n"))
}

/// How each shim install is confirmed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    /// Install without asking
    Yes,
    /// Prompt on the terminal
    Ask,
    /// Nobody to ask, skip every shim
    Decline,
}

impl Confirmation {
    /// Choose from `--yes` and whether stdin is a terminal
    #[must_use]
    pub fn detect(yes: bool, interactive: bool) -> Self {
        match (yes, interactive) {
            (true, _) => Self::Yes,
            (false, true) => Self::Ask,
            (false, false) => Self::Decline,
        }
    }
}

/// Install shims for every hook the repository has executables for
///
/// Unless `yes` is set, asks before creating or overwriting each shim. When
/// stdin is not a terminal nothing is installed without `yes`.
///
/// # Errors
///
/// Returns an error if `.quickhook/` is missing, a shim cannot be written, or
/// the prompt fails
pub fn run(repo: &Repo, bin: &str, yes: bool, color: bool) -> Result<()> {
    let confirmation = Confirmation::detect(yes, std::io::stdin().is_terminal());
    install(&mut std::io::stdout().lock(), repo, bin, confirmation, color)
}

fn install<W: Write>(
    out: &mut W,
    repo: &Repo,
    bin: &str,
    confirmation: Confirmation,
    color: bool,
) -> Result<()> {
    let hooks = list_hooks(repo.root())?;
    if hooks.is_empty() {
        let message = "No hook directories found in .quickhook/";
        if color {
            writeln!(out, "{}", message.yellow())?;
        } else {
            writeln!(out, "{message}")?;
        }
        return Ok(());
    }

    if confirmation == Confirmation::Decline {
        tracing::warn!("stdin is not a terminal, pass --yes to install without asking");
    }

    let hooks_dir = repo.hooks_dir();
    fs::create_dir_all(&hooks_dir)
        .with_context(|| format!("Failed to create {}", hooks_dir.display()))?;

    for hook in hooks {
        let shim_path = hooks_dir.join(hook);
        let display = display_path(repo.root(), &shim_path);

        let confirmed = match confirmation {
            Confirmation::Yes => true,
            Confirmation::Ask => confirm_install(&shim_path, &display)?,
            Confirmation::Decline => false,
        };
        if !confirmed {
            writeln!(out, "Skipping installing shim {}", display.display())?;
            continue;
        }

        install_shim(&shim_path, &shim_content(bin, hook)?)?;
        if color {
            writeln!(out, "{} {}", "Installed shim".green(), display.display())?;
        } else {
            writeln!(out, "Installed shim {}", display.display())?;
        }
    }

    Ok(())
}

fn confirm_install(shim_path: &Path, display: &Path) -> Result<bool> {
    use dialoguer::{Confirm, theme::ColorfulTheme};

    let prompt = if shim_path.exists() {
        format!("Overwrite existing file {}?", display.display())
    } else {
        format!("Create file {}?", display.display())
    };

    let confirmed = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(true)
        .interact()
        .context("Failed to read confirmation")?;
    Ok(confirmed)
}

fn install_shim(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o755))?;
    }

    tracing::debug!("Wrote shim {}", path.display());
    Ok(())
}

/// Show paths relative to the repository root when possible
fn display_path(root: &Path, path: &Path) -> PathBuf {
    path.strip_prefix(root)
        .map_or_else(|_| path.to_path_buf(), Path::to_path_buf)
}
