// src/status.rs

//! One-line progress reporting.
//!
//! Every phase prints `<message>..` as soon as it starts and completes the
//! line with `.done`, `.failed`, `.interrupted` or `.terminated` once it
//! ends, so the line reads e.g. `Rebuilding zlib...done`.

use std::fmt;
use std::future::Future;
use std::io::{self, Write};

use crate::errors::{RebakeError, Result};
use crate::exec::Interruption;

/// How a reported phase ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Done,
    Failed,
    Interrupted,
    Terminated,
}

impl StepOutcome {
    pub fn of<T>(result: &Result<T>) -> Self {
        match result {
            Ok(_) => StepOutcome::Done,
            Err(RebakeError::Interrupted(Interruption::Interrupt)) => StepOutcome::Interrupted,
            Err(RebakeError::Interrupted(Interruption::Terminate)) => StepOutcome::Terminated,
            Err(_) => StepOutcome::Failed,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StepOutcome::Done => "done",
            StepOutcome::Failed => "failed",
            StepOutcome::Interrupted => "interrupted",
            StepOutcome::Terminated => "terminated",
        }
    }
}

impl fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Writes status lines to a terminal (or any writer in tests).
pub struct StatusReporter {
    out: Box<dyn Write + Send>,
}

impl fmt::Debug for StatusReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatusReporter").finish_non_exhaustive()
    }
}

impl StatusReporter {
    pub fn new(out: impl Write + Send + 'static) -> Self {
        Self { out: Box::new(out) }
    }

    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }

    /// Start a status line. Nothing is written after the message until
    /// [`StatusReporter::finish`].
    pub fn begin(&mut self, message: &str) {
        // Status output failures should not abort the build.
        drop(write!(self.out, "{message}.."));
        drop(self.out.flush());
    }

    pub fn finish(&mut self, outcome: StepOutcome) {
        drop(writeln!(self.out, ".{outcome}"));
        drop(self.out.flush());
    }

    /// Report `step` under `message`, passing its result through unchanged.
    pub async fn track<T, F>(&mut self, message: impl AsRef<str>, step: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        self.begin(message.as_ref());
        let result = step.await;
        self.finish(StepOutcome::of(&result));
        result
    }
}
