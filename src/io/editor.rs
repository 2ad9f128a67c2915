//! rustyline-backed line reader.

use super::{CompletionFn, LineIo, LoopOutcome};
use crate::error::CliError;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use std::io::Write;

/// Bridges the session's completion callback into rustyline.
#[derive(Default)]
struct ShellHelper {
    completion: Option<CompletionFn>,
}

impl Completer for ShellHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let Some(complete) = &self.completion else {
            return Ok((pos, Vec::new()));
        };
        let completion = complete(line, pos);
        let pairs = completion
            .candidates
            .into_iter()
            .map(|candidate| Pair {
                display: candidate.clone(),
                replacement: candidate,
            })
            .collect();
        Ok((completion.start, pairs))
    }
}

impl Hinter for ShellHelper {
    type Hint = String;

    fn hint(&self, _line: &str, _pos: usize, _ctx: &Context<'_>) -> Option<String> {
        None
    }
}

impl Highlighter for ShellHelper {}

impl Validator for ShellHelper {}

impl Helper for ShellHelper {}

/// Interactive line editor with tab completion and up-arrow recall.
pub struct EditorIo {
    editor: Editor<ShellHelper, DefaultHistory>,
}

impl EditorIo {
    /// Open an editor on the controlling terminal.
    pub fn new() -> Result<Self, CliError> {
        let mut editor: Editor<ShellHelper, DefaultHistory> =
            Editor::new().map_err(|e| CliError::Readline(e.to_string()))?;
        editor.set_helper(Some(ShellHelper::default()));
        Ok(Self { editor })
    }
}

impl core::fmt::Debug for EditorIo {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EditorIo").finish_non_exhaustive()
    }
}

impl LineIo for EditorIo {
    fn read_line(&mut self, prompt: &str) -> Result<LoopOutcome, CliError> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(LoopOutcome::Line(line)),
            Err(ReadlineError::Interrupted) => Ok(LoopOutcome::Interrupted),
            Err(ReadlineError::Eof) => Ok(LoopOutcome::Eof),
            Err(e) => {
                log::error!("line reader failed: {}", e);
                Err(CliError::Readline(e.to_string()))
            }
        }
    }

    fn write_str(&mut self, s: &str) -> Result<(), CliError> {
        let mut out = std::io::stdout().lock();
        out.write_all(s.as_bytes())?;
        out.flush()?;
        Ok(())
    }

    fn add_history(&mut self, line: &str) {
        if let Err(e) = self.editor.add_history_entry(line) {
            log::debug!("could not record history entry: {}", e);
        }
    }

    fn set_completion(&mut self, completion: CompletionFn) {
        if let Some(helper) = self.editor.helper_mut() {
            helper.completion = Some(completion);
        }
    }
}
