//! Quickhook CLI application entry point
//!
//! This is the minimal main entry point that delegates to the library.

use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    // Configure miette for readable error reporting
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(false)
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))
    .ok();

    let cli = quickhook::Cli::parse();

    match quickhook::run(cli) {
        Ok(code) => code,
        Err(e) => {
            let code = quickhook::error::exit_code_for(&e);
            // Convert anyhow error to miette for display
            let miette_error = miette::Report::msg(format!("{e:#}"));
            eprintln!("{miette_error:?}");
            quickhook::exit_code(code)
        }
    }
}
