//! Tab completion for command names, flags and filesystem paths.
//!
//! Uses stub function pattern - the engine always exists, completion returns
//! no candidates when the `completion` feature is disabled.
//!
//! Decision order for a token that is not the first on the line:
//! 1. Unknown (or missing) command: nothing
//! 2. Token looks like a path: path completion
//! 3. Previous token is a path-valued flag: path completion
//! 4. Token starts with `-`: the command's flag names
//! 5. Anything else: path completion

#![cfg_attr(not(feature = "completion"), allow(unused_variables, dead_code))]

pub mod path;

use crate::config::ShellConfig;
use crate::registry::CommandCatalog;
use std::path::PathBuf;

#[cfg(feature = "completion")]
use crate::registry::CommandSpec;
#[cfg(feature = "completion")]
use std::collections::BTreeSet;

/// Keywords the shell handles itself; offered alongside registry commands.
pub const BUILTIN_COMMANDS: &[&str] = &["exit", "help", "q", "quit"];

/// Candidates for the token under the cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Completion {
    /// Byte offset in the line where the replaced text starts
    pub start: usize,

    /// Replacement candidates, sorted and duplicate-free
    pub candidates: Vec<String>,
}

/// Context-sensitive completer.
#[derive(Debug, Clone)]
pub struct CompletionEngine {
    marker: char,
    path_flags: Vec<String>,
    base_dir: Option<PathBuf>,
}

impl CompletionEngine {
    /// Engine using the marker and path-flag defaults from `config`.
    pub fn new(config: &ShellConfig) -> Self {
        Self {
            marker: config.command_marker,
            path_flags: config.path_flags.clone(),
            base_dir: None,
        }
    }

    /// Resolve relative paths against `dir` instead of the working directory.
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    /// Complete at byte position `pos` of `line`.
    ///
    /// The current token runs back from `pos` to the previous unescaped space.
    /// For a marker-prefixed first token the replaced span starts after the
    /// marker, so candidates are bare command names.
    pub fn complete_at(&self, catalog: &dyn CommandCatalog, line: &str, pos: usize) -> Completion {
        let pos = pos.min(line.len());
        let Some(text) = line.get(..pos) else {
            return Completion::default();
        };
        let start = current_token_start(text);
        let token = &text[start..];

        let mut start = start;
        if text[..start].trim().is_empty() && token.starts_with(self.marker) {
            start += self.marker.len_utf8();
        }

        Completion {
            start,
            candidates: self.complete(catalog, text, token),
        }
    }

    /// Complete `current_token`, the trailing token of `text_before_cursor`.
    #[cfg(feature = "completion")]
    pub fn complete(
        &self,
        catalog: &dyn CommandCatalog,
        text_before_cursor: &str,
        current_token: &str,
    ) -> Vec<String> {
        let split = text_before_cursor.len().saturating_sub(current_token.len());
        let before = text_before_cursor.get(..split).unwrap_or("");

        if before.trim().is_empty() {
            let prefix = current_token
                .strip_prefix(self.marker)
                .unwrap_or(current_token);
            return command_names(catalog, prefix);
        }

        let mut previous = before.split_whitespace();
        let Some(first) = previous.next() else {
            return Vec::new();
        };
        let name = first.strip_prefix(self.marker).unwrap_or(first);
        let Some(spec) = catalog.lookup(name) else {
            return Vec::new();
        };
        let prev_token = previous.last();

        self.complete_argument(spec, prev_token, current_token)
    }

    /// Complete `current_token` (stub version).
    #[cfg(not(feature = "completion"))]
    pub fn complete(
        &self,
        catalog: &dyn CommandCatalog,
        text_before_cursor: &str,
        current_token: &str,
    ) -> Vec<String> {
        Vec::new()
    }

    #[cfg(feature = "completion")]
    fn complete_argument(
        &self,
        spec: &CommandSpec,
        prev_token: Option<&str>,
        token: &str,
    ) -> Vec<String> {
        if path::looks_like_path(token) {
            return self.paths(token);
        }

        if let Some(prev) = prev_token
            && prev.starts_with('-')
            && spec.takes_path_value(prev, &self.path_flags)
        {
            return self.paths(token);
        }

        if token.starts_with('-') {
            // `--output=./sr` completes the value part
            if let Some((flag, value)) = token.split_once('=') {
                if spec.takes_path_value(flag, &self.path_flags) {
                    return self
                        .paths(value)
                        .into_iter()
                        .map(|p| format!("{}={}", flag, p))
                        .collect();
                }
                return Vec::new();
            }
            let names: BTreeSet<String> = spec
                .flag_names()
                .into_iter()
                .filter(|name| name.starts_with(token))
                .collect();
            return names.into_iter().collect();
        }

        self.paths(token)
    }

    #[cfg(feature = "completion")]
    fn paths(&self, token: &str) -> Vec<String> {
        let cwd = match &self.base_dir {
            Some(dir) => dir.clone(),
            None => match std::env::current_dir() {
                Ok(dir) => dir,
                Err(e) => {
                    log::debug!("path completion: no working directory: {}", e);
                    return Vec::new();
                }
            },
        };
        path::complete_path(token, &cwd)
    }
}

#[cfg(feature = "completion")]
fn command_names(catalog: &dyn CommandCatalog, prefix: &str) -> Vec<String> {
    let names: BTreeSet<String> = catalog
        .commands()
        .into_iter()
        .map(|spec| spec.name.as_str())
        .chain(BUILTIN_COMMANDS.iter().copied())
        .filter(|name| name.starts_with(prefix))
        .map(str::to_string)
        .collect();
    names.into_iter().collect()
}

/// Byte offset where the token ending at the end of `text` begins.
///
/// A backslash-escaped space does not end a token.
fn current_token_start(text: &str) -> usize {
    let bytes = text.as_bytes();
    let mut idx = bytes.len();
    while idx > 0 {
        let b = bytes[idx - 1];
        if b.is_ascii_whitespace() && !(idx >= 2 && bytes[idx - 2] == b'\\') {
            break;
        }
        idx -= 1;
    }
    idx
}
