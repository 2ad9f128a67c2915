//! Command history buffer and its on-disk form.
//!
//! Uses stub type pattern - struct always exists, but behavior is feature-gated.
//! With `history` disabled nothing is recorded, loaded or saved.
//!
//! The in-memory buffer keeps every line in insertion order. Consecutive
//! duplicates are collapsed only when the buffer is persisted.

#![cfg_attr(not(feature = "history"), allow(unused_variables))]

use std::path::Path;

/// Session history.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandHistory {
    #[cfg(feature = "history")]
    lines: Vec<String>,
}

impl CommandHistory {
    /// Create an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// History seeded with previously persisted lines.
    pub fn from_lines(lines: Vec<String>) -> Self {
        let mut history = Self::new();
        for line in lines {
            history.add(&line);
        }
        history
    }

    /// Append a line. Blank lines are ignored.
    #[cfg(feature = "history")]
    pub fn add(&mut self, line: &str) {
        if line.trim().is_empty() {
            return;
        }
        self.lines.push(line.to_string());
    }

    /// Append a line (stub version - no-op).
    #[cfg(not(feature = "history"))]
    pub fn add(&mut self, line: &str) {}

    /// All lines, oldest first.
    #[cfg(feature = "history")]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// All lines (stub version - always empty).
    #[cfg(not(feature = "history"))]
    pub fn lines(&self) -> &[String] {
        &[]
    }

    /// Number of stored lines.
    pub fn len(&self) -> usize {
        self.lines().len()
    }

    /// True when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.lines().is_empty()
    }

    /// Lines to write to disk: consecutive duplicates collapsed, then the
    /// newest `max` kept.
    pub fn persistable(&self, max: usize) -> Vec<String> {
        let mut out: Vec<String> = Vec::with_capacity(self.len());
        for line in self.lines() {
            if out.last() != Some(line) {
                out.push(line.clone());
            }
        }
        let skip = out.len().saturating_sub(max);
        out.split_off(skip)
    }
}

/// Read persisted history, one entry per line.
///
/// A missing file is an empty history. Other failures are logged and also
/// yield an empty history.
#[cfg(feature = "history")]
pub fn load_lines(path: &Path) -> Vec<String> {
    match std::fs::read_to_string(path) {
        Ok(text) => text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(str::to_string)
            .collect(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
        Err(e) => {
            log::warn!("could not load history from {}: {}", path.display(), e);
            Vec::new()
        }
    }
}

/// Read persisted history (stub version - always empty).
#[cfg(not(feature = "history"))]
pub fn load_lines(path: &Path) -> Vec<String> {
    Vec::new()
}

/// Write `lines` to `path`, replacing its contents.
///
/// Parent directories are created as needed. Returns false (after logging)
/// when the file could not be written.
#[cfg(feature = "history")]
pub fn save_lines(path: &Path, lines: &[String]) -> bool {
    let result = (|| -> std::io::Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let mut text = lines.join("\n");
        if !text.is_empty() {
            text.push('\n');
        }
        std::fs::write(path, text)
    })();

    match result {
        Ok(()) => true,
        Err(e) => {
            log::warn!("could not save history to {}: {}", path.display(), e);
            false
        }
    }
}

/// Write history (stub version - no-op).
#[cfg(not(feature = "history"))]
pub fn save_lines(path: &Path, lines: &[String]) -> bool {
    false
}
