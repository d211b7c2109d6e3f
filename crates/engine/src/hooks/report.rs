//! Result aggregation and output
//!
//! Results are printed in the order they are handed over, which is discovery
//! order for both sequential and concurrent categories. Every line is prefixed
//! with the executable's base name.

use super::executor::ExecutionResult;
use owo_colors::OwoColorize;
use quickhook_core::Result;
use std::io::Write;

/// Which captured stream a line came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stream {
    Stdout,
    Stderr,
}

/// Prints results to a sink and remembers whether anything failed
#[derive(Debug)]
pub struct Reporter<W: Write> {
    out: W,
    color: bool,
    failed: bool,
}

impl<W: Write> Reporter<W> {
    /// Create a reporter writing to `out`
    pub fn new(out: W, color: bool) -> Self {
        Self {
            out,
            color,
            failed: false,
        }
    }

    /// Print one result
    ///
    /// Standard error is always printed. Standard output is printed, before
    /// standard error, only when the executable failed.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the sink fails
    pub fn report(&mut self, result: &ExecutionResult) -> Result<()> {
        let name = result.executable.name();

        if !result.passed() {
            self.failed = true;
            self.write_stream(&name, Stream::Stdout, &result.stdout)?;
        }
        self.write_stream(&name, Stream::Stderr, &result.stderr)?;

        Ok(())
    }

    /// Print every result in order
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the sink fails
    pub fn report_all(&mut self, results: &[ExecutionResult]) -> Result<()> {
        for result in results {
            self.report(result)?;
        }
        Ok(())
    }

    /// Print an unprefixed notice, such as the empty file set message
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the sink fails
    pub fn notice(&mut self, message: &str) -> Result<()> {
        if self.color {
            writeln!(self.out, "{}", message.yellow())?;
        } else {
            writeln!(self.out, "{message}")?;
        }
        Ok(())
    }

    /// Whether any reported result failed
    #[must_use]
    pub fn any_failed(&self) -> bool {
        self.failed
    }

    /// Flush and hand back the sink
    ///
    /// # Errors
    ///
    /// Returns an error if flushing fails
    pub fn into_inner(mut self) -> Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }

    fn write_stream(&mut self, name: &str, stream: Stream, content: &str) -> Result<()> {
        let content = content.trim();
        if content.is_empty() {
            return Ok(());
        }

        let prefix = format!("{name}:");
        for line in content.lines() {
            match (self.color, stream) {
                (false, _) => write!(self.out, "{prefix}")?,
                (true, Stream::Stdout) => write!(self.out, "{}", prefix.red())?,
                (true, Stream::Stderr) => write!(self.out, "{}", prefix.yellow())?,
            }

            if line.is_empty() {
                writeln!(self.out)?;
            } else {
                writeln!(self.out, " {line}")?;
            }
        }

        Ok(())
    }
}
