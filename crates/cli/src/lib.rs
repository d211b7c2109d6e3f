//! Quickhook CLI library
//!
//! This library contains all the CLI logic for quickhook, making it reusable
//! for testing and integration with other tools.

pub mod cmd;
pub mod error;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use cmd::hook::HookCommands;
use quickhook_config::Config;
use quickhook_engine::{Repo, Timings};

/// Quickhook - a fast, parallel git hook runner
#[derive(Debug, Parser)]
#[command(name = "quickhook")]
#[command(about = "Run git hooks from .quickhook/, in parallel where it is safe")]
#[command(version)]
#[command(long_about = "Run git hooks from .quickhook/, in parallel where it is safe

Executables are discovered on every run:
  • .quickhook/pre-commit-mutating/  run one at a time, may use git
  • .quickhook/pre-commit/           run in parallel, git is denied
  • .quickhook/commit-msg/           run one at a time with the message file

Staged files are passed on stdin, one path per line.")]
pub struct Cli {
    /// Disable colored output
    #[arg(long, env = "NO_COLOR")]
    pub no_color: bool,

    /// Print how long each step took
    #[arg(long, env = "QUICKHOOK_TRACE")]
    pub trace: bool,

    /// Enable verbose output (shows DEBUG level logs)
    #[arg(short, long)]
    pub verbose: bool,

    /// Write logs to a file (useful for debugging)
    #[arg(long, env = "QUICKHOOK_LOG_FILE", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for quickhook CLI
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Install shims into .git/hooks that call quickhook
    Install {
        /// Install without asking
        #[arg(short, long)]
        yes: bool,

        /// Command the shims invoke
        #[arg(long, value_name = "PATH", default_value = "quickhook")]
        bin: String,
    },

    /// Run a git hook
    #[command(subcommand)]
    Hook(HookCommands),
}

/// Main entry point for the CLI logic
///
/// Returns the exit code for the process; hook failures are not errors.
///
/// # Errors
///
/// Returns an error if:
/// - Logging initialization fails
/// - The current directory is not inside a git working tree
/// - `.quickhook.toml` cannot be parsed
/// - Discovery, file resolution or shim installation fails
pub fn run(cli: Cli) -> Result<ExitCode> {
    let log_color = use_color(cli.no_color, true, std::io::stderr().is_terminal());
    quickhook_config::logging::init(cli.verbose, cli.log_file.as_deref(), log_color)?;

    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        git_sha = option_env!("VERGEN_GIT_SHA").unwrap_or("unknown"),
        rustc = option_env!("VERGEN_RUSTC_SEMVER").unwrap_or("unknown"),
        built = option_env!("VERGEN_BUILD_TIMESTAMP").unwrap_or("unknown"),
        "Starting quickhook"
    );

    let repo = Repo::from_env().context("Failed to locate the git repository")?;
    let config = Config::load_from_root(repo.root()).context("Failed to load configuration")?;
    let color = use_color(cli.no_color, config.ui.color, std::io::stdout().is_terminal());

    let timings = if cli.trace {
        Timings::enabled()
    } else {
        Timings::disabled()
    };

    let code = match cli.command {
        Commands::Install { yes, bin } => {
            cmd::install::run(&repo, &bin, yes, color)?;
            ExitCode::SUCCESS
        }
        Commands::Hook(hook) => {
            let outcome = cmd::hook::run(hook, repo, &config, color, &timings)?;
            exit_code(outcome.exit_code())
        }
    };

    if timings.is_enabled() {
        timings.write_summary(&mut std::io::stderr().lock())?;
    }

    Ok(code)
}

/// Whether output going to a stream should carry ANSI colors
#[must_use]
pub fn use_color(no_color: bool, configured: bool, is_terminal: bool) -> bool {
    !no_color && configured && is_terminal
}

/// Convert a numeric exit code
#[must_use]
pub fn exit_code(code: i32) -> ExitCode {
    u8::try_from(code).map_or(ExitCode::FAILURE, ExitCode::from)
}
