//! Line-oriented I/O abstraction.
//!
//! The `LineIo` trait is the seam between the session loop and whatever reads
//! lines from the user. A read yields a [`LoopOutcome`] value instead of
//! unwinding on Ctrl-C, so the loop handles interrupts like any other input.
//!
//! Implementations:
//! - [`EditorIo`]: rustyline editor with completion and in-memory history
//!   (`readline` feature)
//! - [`StdIo`]: plain buffered stdin/stdout, for piped input

use crate::completion::Completion;
use crate::error::CliError;
use std::io::{BufRead, Write};

#[cfg(feature = "readline")]
mod editor;

#[cfg(feature = "readline")]
pub use editor::EditorIo;

/// Result of one blocking read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopOutcome {
    /// A complete input line (without the trailing newline)
    Line(String),

    /// End of input
    Eof,

    /// The user pressed Ctrl-C at the prompt
    Interrupted,
}

/// Completion callback handed to the line reader: `(line, cursor) -> candidates`.
pub type CompletionFn = Box<dyn Fn(&str, usize) -> Completion>;

/// Line reader and writer used by a session.
pub trait LineIo {
    /// Show `prompt` and block until the user submits a line, closes input,
    /// or interrupts.
    fn read_line(&mut self, prompt: &str) -> Result<LoopOutcome, CliError>;

    /// Write text to the output.
    fn write_str(&mut self, s: &str) -> Result<(), CliError>;

    /// Write text followed by a newline.
    fn write_line(&mut self, s: &str) -> Result<(), CliError> {
        self.write_str(s)?;
        self.write_str("\n")
    }

    /// Append a line to the reader's recall list (up-arrow history).
    ///
    /// Readers without recall ignore it.
    fn add_history(&mut self, line: &str) {
        let _ = line;
    }

    /// Install the tab-completion callback.
    ///
    /// Readers without completion ignore it.
    fn set_completion(&mut self, completion: CompletionFn) {
        let _ = completion;
    }
}

/// Plain stdin/stdout reader.
///
/// Has no completion or recall, and Ctrl-C is left to the default signal
/// handling. Suited to piped or scripted input.
#[derive(Debug, Default)]
pub struct StdIo;

impl StdIo {
    /// Reader on the process's stdin/stdout.
    pub fn new() -> Self {
        Self
    }
}

impl LineIo for StdIo {
    fn read_line(&mut self, prompt: &str) -> Result<LoopOutcome, CliError> {
        self.write_str(prompt)?;

        let mut line = String::new();
        let read = std::io::stdin().lock().read_line(&mut line)?;
        if read == 0 {
            return Ok(LoopOutcome::Eof);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(LoopOutcome::Line(line))
    }

    fn write_str(&mut self, s: &str) -> Result<(), CliError> {
        let mut out = std::io::stdout().lock();
        out.write_all(s.as_bytes())?;
        out.flush()?;
        Ok(())
    }
}
