//! Hook commands
//!
//! Entry points git calls through the installed shims.

use clap::{Args, Subcommand};
use quickhook_config::{Config, EmptyFilesPolicy};
use quickhook_engine::{
    CommitMsg, FileSource, HookOutcome, PreCommit, PreCommitOptions, Repo, Reporter, Timings,
    create_provider,
};
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Git hooks quickhook runs
#[derive(Debug, Subcommand)]
pub enum HookCommands {
    /// Run pre-commit-mutating, then pre-commit executables
    PreCommit(PreCommitArgs),

    /// Run commit-msg executables against the message file
    CommitMsg {
        /// File holding the commit message, as passed by git
        message_file: PathBuf,
    },
}

/// Options for `hook pre-commit`
#[derive(Debug, Args)]
pub struct PreCommitArgs {
    /// Check these files instead of the staged ones
    #[arg(long, num_args = 1.., value_name = "FILE", conflicts_with = "all")]
    pub files: Vec<String>,

    /// Check every tracked file instead of the staged ones
    #[arg(long)]
    pub all: bool,

    /// What to do when no files are staged: skip, succeed or run
    #[arg(long, value_name = "POLICY")]
    pub on_empty: Option<EmptyFilesPolicy>,
}

impl PreCommitArgs {
    /// Where the target files come from
    #[must_use]
    pub fn file_source(&self) -> FileSource {
        if !self.files.is_empty() {
            FileSource::Explicit(self.files.clone())
        } else if self.all {
            FileSource::All
        } else {
            FileSource::Staged
        }
    }
}

/// Run one hook command, writing the report to stdout
pub fn run(
    command: HookCommands,
    repo: Repo,
    config: &Config,
    color: bool,
    timings: &Timings,
) -> Result<HookOutcome> {
    let mut reporter = Reporter::new(std::io::stdout().lock(), color);

    let outcome = match command {
        HookCommands::PreCommit(args) => {
            let options = PreCommitOptions {
                files: args.file_source(),
                on_empty: args.on_empty.unwrap_or(config.hooks.on_empty),
                parallelism: config.hooks.effective_parallelism(),
            };
            let provider = create_provider(config.hooks.git);
            PreCommit::new(repo, provider, options).run(&mut reporter, timings)?
        }
        HookCommands::CommitMsg { message_file } => {
            let message_file = absolute(&message_file)?;
            CommitMsg::new(repo).run(&message_file, &mut reporter, timings)?
        }
    };

    reporter.into_inner()?;
    Ok(outcome)
}

/// Executables run from the repository root; keep a relative message path usable
fn absolute(path: &Path) -> Result<PathBuf> {
    Ok(std::path::absolute(path)?)
}
