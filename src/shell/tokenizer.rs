//! Shell-style tokenization of command arguments.
//!
//! Quoting follows POSIX shell rules (single quotes, double quotes, backslash
//! escapes). Input that cannot be tokenized that way, such as an unterminated
//! quote, is split on whitespace instead so the command still runs.

use crate::error::TokenizeError;

/// Split `text` with shell quoting rules.
///
/// # Errors
///
/// Returns [`TokenizeError`] for unbalanced quotes or a trailing backslash.
pub fn split_shell(text: &str) -> Result<Vec<String>, TokenizeError> {
    shlex::split(text).ok_or_else(|| TokenizeError(text.to_string()))
}

/// Tokenize `text`, falling back to plain whitespace splitting.
///
/// Never fails: `echo "unterminated` yields `["echo", "\"unterminated"]`.
pub fn tokenize(text: &str) -> Vec<String> {
    match split_shell(text) {
        Ok(tokens) => tokens,
        Err(e) => {
            log::debug!("{}, splitting on whitespace", e);
            text.split_whitespace().map(str::to_string).collect()
        }
    }
}

/// Split a line into its first word and the untouched remainder.
///
/// The remainder has its leading whitespace removed but is otherwise raw,
/// which is what free-text commands receive.
pub fn split_command(line: &str) -> (&str, &str) {
    let line = line.trim_start();
    match line.find(char::is_whitespace) {
        Some(idx) => (&line[..idx], line[idx..].trim_start()),
        None => (line, ""),
    }
}
