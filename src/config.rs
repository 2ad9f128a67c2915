//! Session configuration.
//!
//! `ShellConfig` carries the tunables of a session (prompt, command marker,
//! history location, interrupt policy). It deserializes from TOML with every
//! field optional, and host CLI flags are applied on top with the `with_*`
//! builders.

use crate::error::CliError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Flags that conventionally take a filesystem path as their value.
///
/// Completion after one of these offers paths even when the current token does
/// not look like one yet. A `CommandSpec` can replace this list.
pub const DEFAULT_PATH_FLAGS: &[&str] = &[
    "--file",
    "--output",
    "--input",
    "--path",
    "--dir",
    "--directory",
    "-f",
    "-o",
    "-i",
    "-p",
    "-d",
];

/// File name of the default history file (in the home directory).
pub const DEFAULT_HISTORY_FILE: &str = ".shellkit_history";

/// What a single Ctrl-C at the prompt does. A second one within the timeout
/// always ends the session.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterruptBehavior {
    /// Discard the line and print a hint about how to exit
    #[default]
    ClearLine,

    /// Discard the line and print the help reminder
    ShowHelp,

    /// Discard the line without printing anything
    Silent,
}

/// Shell configuration.
///
/// Defaults:
/// - prompt: `"> "`
/// - command_marker: `'/'`
/// - history_file: `~/.shellkit_history`
/// - history_size: 1000 entries
/// - interrupt_timeout_ms: 500
/// - interrupt_behavior: `clear_line`
/// - allow_nested: true
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShellConfig {
    /// Prompt shown before each line (decorated with the depth when nested)
    pub prompt: String,

    /// Leading character that marks a line as an explicit command
    pub command_marker: char,

    /// History file loaded at session start and written at exit
    pub history_file: Option<PathBuf>,

    /// Maximum number of history entries persisted
    pub history_size: usize,

    /// Window for the double-interrupt exit, in milliseconds
    pub interrupt_timeout_ms: u64,

    /// Behavior of a single interrupt
    pub interrupt_behavior: InterruptBehavior,

    /// Whether a session may start while another is active in this context
    pub allow_nested: bool,

    /// Print error sources and panic payloads
    pub debug: bool,

    /// Optional banner printed when the session starts
    pub welcome: Option<String>,

    /// Flags whose values complete as paths
    pub path_flags: Vec<String>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: "> ".into(),
            command_marker: '/',
            history_file: default_history_path(),
            history_size: 1000,
            interrupt_timeout_ms: 500,
            interrupt_behavior: InterruptBehavior::ClearLine,
            allow_nested: true,
            debug: false,
            welcome: None,
            path_flags: DEFAULT_PATH_FLAGS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ShellConfig {
    /// Configuration for embedding and tests: no history file, silent interrupts.
    pub fn minimal() -> Self {
        Self {
            history_file: None,
            interrupt_behavior: InterruptBehavior::Silent,
            ..Self::default()
        }
    }

    /// Parse configuration from TOML text. Missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, CliError> {
        toml::from_str(text).map_err(|e| CliError::Config(e.to_string()))
    }

    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| CliError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&text)
    }

    /// Override the prompt (`--prompt`).
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Override the history file (`--history-file`).
    pub fn with_history_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.history_file = Some(path.into());
        self
    }

    /// Disable history persistence.
    pub fn without_history_file(mut self) -> Self {
        self.history_file = None;
        self
    }

    /// Override the command marker.
    pub fn with_command_marker(mut self, marker: char) -> Self {
        self.command_marker = marker;
        self
    }

    /// Override the double-interrupt window.
    pub fn with_interrupt_timeout(mut self, timeout: Duration) -> Self {
        self.interrupt_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Override the single-interrupt behavior.
    pub fn with_interrupt_behavior(mut self, behavior: InterruptBehavior) -> Self {
        self.interrupt_behavior = behavior;
        self
    }

    /// Allow or refuse nested sessions.
    pub fn with_allow_nested(mut self, allow: bool) -> Self {
        self.allow_nested = allow;
        self
    }

    /// Toggle debug output.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Set the welcome banner.
    pub fn with_welcome(mut self, welcome: impl Into<String>) -> Self {
        self.welcome = Some(welcome.into());
        self
    }

    /// Double-interrupt window as a `Duration`.
    pub fn interrupt_timeout(&self) -> Duration {
        Duration::from_millis(self.interrupt_timeout_ms)
    }
}

fn default_history_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(DEFAULT_HISTORY_FILE))
}
