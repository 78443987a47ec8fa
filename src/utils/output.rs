//! Buildpack-style staging output.
//!
//! Staging logs are read by people watching a push scroll by, so they follow the
//! platform convention: step headers start with `----->`, everything else is
//! indented under the step, and warnings and errors carry a visible marker.
//! Every line is mirrored as a `tracing` event so `RUST_LOG` captures the same
//! story with module targets attached.

use colored::Colorize;
use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

const STEP_PREFIX: &str = "----->";
const INDENT: &str = "       ";

/// Writer for user-facing staging messages.
pub struct StagingLog {
    writer: RefCell<Box<dyn Write>>,
}

impl StagingLog {
    /// Log to standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }

    /// Log to an arbitrary writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self {
            writer: RefCell::new(writer),
        }
    }

    /// Log into an in-memory buffer; the returned handle reads what was written.
    #[must_use]
    pub fn buffered() -> (Self, LogBuffer) {
        let buffer = LogBuffer::default();
        (Self::new(Box::new(buffer.clone())), buffer)
    }

    /// Start a new staging step.
    pub fn begin_step(&self, message: &str) {
        tracing::info!(target: "staging", "{message}");
        self.write_line(&format!("{} {}", STEP_PREFIX.bold(), message));
    }

    /// Informational line under the current step.
    pub fn info(&self, message: &str) {
        tracing::info!(target: "staging", "{message}");
        self.write_line(&format!("{INDENT}{message}"));
    }

    /// Warning under the current step.
    pub fn warning(&self, message: &str) {
        tracing::warn!(target: "staging", "{message}");
        self.write_line(&format!("{INDENT}{} {}", "**WARNING**".yellow().bold(), message));
    }

    /// Error under the current step.
    pub fn error(&self, message: &str) {
        tracing::error!(target: "staging", "{message}");
        self.write_line(&format!("{INDENT}{} {}", "**ERROR**".red().bold(), message));
    }

    fn write_line(&self, line: &str) {
        let mut writer = self.writer.borrow_mut();
        // Staging output is best effort; a closed stdout must not abort staging.
        let _ = writeln!(writer, "{line}");
        let _ = writer.flush();
    }
}

impl Default for StagingLog {
    fn default() -> Self {
        Self::stdout()
    }
}

/// Shared in-memory sink used by [`StagingLog::buffered`].
#[derive(Clone, Default)]
pub struct LogBuffer {
    inner: Rc<RefCell<Vec<u8>>>,
}

impl LogBuffer {
    /// Everything written so far, lossily decoded.
    #[must_use]
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.inner.borrow()).into_owned()
    }
}

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
