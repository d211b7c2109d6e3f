//! Logging configuration for quickhook
//!
//! Diagnostics go to stderr; stdout belongs to hook output.

use crate::Result;
use std::path::Path;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Build the default filter directive for the quickhook crates
fn default_directive(verbose: bool) -> String {
    let level = if verbose { "debug" } else { "warn" };
    format!("quickhook={level},quickhook_engine={level},quickhook_config={level}")
}

fn filter_err(e: tracing_subscriber::filter::ParseError) -> quickhook_core::Error {
    quickhook_core::Error::Config(format!("Invalid log filter: {e}"))
}

/// Initialize the logging system
///
/// # Arguments
/// * `verbose` - Enable debug level logging
/// * `log_file` - Optional path to write logs to a file
/// * `color` - Emit ANSI colors on stderr
///
/// # Examples
/// ```ignore
/// // Warnings only
/// init(false, None, true)?;
///
/// // Verbose mode, also written to a file
/// init(true, Some(Path::new("quickhook.log")), true)?;
/// ```
pub fn init(verbose: bool, log_file: Option<&Path>, color: bool) -> Result<()> {
    // Allows overriding with RUST_LOG env var
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive(verbose)))
        .map_err(filter_err)?;

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(false)
        .with_line_number(false)
        .without_time() // Hook runs are short, timestamps are noise
        .compact()
        .with_ansi(color)
        .with_filter(env_filter);

    let init_err = |e: tracing_subscriber::util::TryInitError| {
        quickhook_core::Error::Message(format!("Failed to init logging: {e}"))
    };

    match log_file {
        Some(log_path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_path)?;

            let file_layer = fmt::layer()
                .with_writer(file)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .pretty()
                .with_filter(EnvFilter::try_new("debug").map_err(filter_err)?);

            tracing_subscriber::registry()
                .with(stderr_layer)
                .with(file_layer)
                .try_init()
                .map_err(init_err)?;
        }
        None => {
            tracing_subscriber::registry()
                .with(stderr_layer)
                .try_init()
                .map_err(init_err)?;
        }
    }

    Ok(())
}
