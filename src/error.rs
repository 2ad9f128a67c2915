//! Error types for shell operations.
//!
//! Everything except [`CliError`] is local to one loop iteration: the session
//! prints it and keeps reading. `CliError` is what ends `Session::run`.
//! Messages are single-line and meant to be shown to the user as-is.

use thiserror::Error;

/// Malformed quoting in an input line (unterminated quote, dangling escape).
///
/// Never fatal: the invoker falls back to whitespace splitting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed quoting in '{0}'")]
pub struct TokenizeError(pub String);

/// Flag parsing failure. The command is not executed when one of these occurs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlagError {
    /// Flag-looking tokens that match no declared flag (all of them, in input order)
    #[error("unknown flag(s): {}", .0.join(", "))]
    UnknownFlags(Vec<String>),

    /// Flag that takes a value appeared without one
    #[error("flag {0} requires a value")]
    MissingValue(String),

    /// Numeric flag received non-numeric text
    #[error("flag {flag} expects a number, got '{value}'")]
    InvalidNumber {
        /// Flag as written in canonical long form (`--limit`)
        flag: String,
        /// Offending text
        value: String,
    },

    /// Boolean flag given an explicit value that is not a boolean
    #[error("flag {flag} expects true or false, got '{value}'")]
    InvalidBoolean {
        /// Flag in canonical long form
        flag: String,
        /// Offending text
        value: String,
    },

    /// Enum-restricted flag received a value outside its allowed set
    #[error("invalid value '{value}' for {flag} (allowed: {})", .allowed.join(", "))]
    InvalidChoice {
        /// Flag in canonical long form
        flag: String,
        /// Offending text
        value: String,
        /// The allowed values, in declaration order
        allowed: Vec<String>,
    },

    /// Map flag entry without a `key:value` separator
    #[error("flag {flag} expects key:value entries, got '{entry}'")]
    InvalidMapEntry {
        /// Flag in canonical long form
        flag: String,
        /// Offending entry
        entry: String,
    },

    /// Required flag absent after parsing (and no default declared)
    #[error("missing required flag {0}")]
    MissingRequired(String),
}

/// Invocation rejected before the command ran.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UsageError {
    /// Flag parsing failed
    #[error(transparent)]
    Flags(#[from] FlagError),

    /// Wrong number of positional arguments
    #[error("{}", describe_arg_count(.expected_min, .expected_max, .received))]
    InvalidArgumentCount {
        /// Minimum expected arguments
        expected_min: usize,
        /// Maximum expected arguments (`None` for variadic commands)
        expected_max: Option<usize>,
        /// Number of arguments received
        received: usize,
    },
}

fn describe_arg_count(min: &usize, max: &Option<usize>, received: &usize) -> String {
    match max {
        Some(max) if max == min => format!("Expected {} arguments, got {}", min, received),
        Some(max) => format!("Expected {}-{} arguments, got {}", min, max, received),
        None => format!("Expected at least {} arguments, got {}", min, received),
    }
}

/// Failure raised by a command (or the default handler) while running.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Command executed but reported failure
    #[error("{0}")]
    Failed(String),

    /// Command asked to terminate the whole process with this exit code.
    ///
    /// The session intercepts it and keeps running.
    #[error("command requested process exit with code {0}")]
    Exit(i32),

    /// Command observed a user interrupt and abandoned its work
    #[error("interrupted")]
    Interrupted,

    /// I/O failure inside the command
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Any other error the command wants to surface
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl CommandError {
    /// Shorthand for [`CommandError::Failed`].
    pub fn failed(message: impl Into<String>) -> Self {
        CommandError::Failed(message.into())
    }
}

/// Session-level error. Ends `Session::run`; nothing inside the loop produces it
/// except a broken line reader.
#[derive(Debug, Error)]
pub enum CliError {
    /// Terminal or file I/O failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Line reader failed for a reason other than EOF or interrupt
    #[error("line reader error: {0}")]
    Readline(String),

    /// Nested sessions are disabled and a session is already running
    #[error("nested session refused (already at depth {depth})")]
    NestedSessionDenied {
        /// Depth of the enclosing session
        depth: usize,
    },

    /// Configuration could not be read or parsed
    #[error("invalid configuration: {0}")]
    Config(String),
}
