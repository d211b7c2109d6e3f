//! Timing collector for `--trace`
//!
//! A `Timings` value is created by the top-level invocation and passed by
//! reference to whatever wants to record spans. A disabled collector records
//! nothing, so call sites do not need to check.

use std::fmt;
use std::io::{self, Write};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// One finished named interval
#[derive(Debug, Clone)]
pub struct SpanRecord {
    /// Span name, e.g. `find pre-commit` or `hook pre-commit lint`
    pub name: String,
    /// How long the span was open
    pub elapsed: Duration,
}

impl fmt::Display for SpanRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.elapsed.as_millis() <= 2 {
            write!(f, "{} {}µs", self.name, self.elapsed.as_micros())
        } else {
            write!(f, "{} {}ms", self.name, self.elapsed.as_millis())
        }
    }
}

/// Thread-safe collector of named spans
#[derive(Debug, Default)]
pub struct Timings {
    spans: Option<Mutex<Vec<SpanRecord>>>,
}

impl Timings {
    /// A collector that records spans
    #[must_use]
    pub fn enabled() -> Self {
        Self {
            spans: Some(Mutex::new(Vec::new())),
        }
    }

    /// A collector that drops everything
    #[must_use]
    pub fn disabled() -> Self {
        Self { spans: None }
    }

    /// Whether spans are being recorded
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.spans.is_some()
    }

    /// Open a span; it is recorded when the guard is dropped
    #[must_use = "the span ends when the guard is dropped"]
    pub fn span(&self, name: impl Into<String>) -> SpanGuard<'_> {
        SpanGuard {
            timings: self,
            name: if self.is_enabled() {
                name.into()
            } else {
                String::new()
            },
            start: Instant::now(),
        }
    }

    fn record(&self, name: String, elapsed: Duration) {
        if let Some(spans) = &self.spans {
            // A poisoned lock only means another span panicked mid-push
            let mut spans = spans
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            spans.push(SpanRecord { name, elapsed });
        }
    }

    /// Finished spans in the order they ended
    #[must_use]
    pub fn spans(&self) -> Vec<SpanRecord> {
        self.spans.as_ref().map_or_else(Vec::new, |spans| {
            spans
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .clone()
        })
    }

    /// Write the `Traced N span(s):` summary
    pub fn write_summary<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let spans = self.spans();
        writeln!(out, "Traced {} span(s):", spans.len())?;
        for span in &spans {
            writeln!(out, "{span}")?;
        }
        Ok(())
    }
}

/// Guard returned by [`Timings::span`]
#[derive(Debug)]
pub struct SpanGuard<'a> {
    timings: &'a Timings,
    name: String,
    start: Instant,
}

impl Drop for SpanGuard<'_> {
    fn drop(&mut self) {
        if self.timings.is_enabled() {
            self.timings
                .record(std::mem::take(&mut self.name), self.start.elapsed());
        }
    }
}
