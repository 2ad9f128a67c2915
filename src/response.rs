//! Response types for command execution.
//!
//! `Response` represents successful execution with a message and formatting flags.
//! Command failures return `Err(CommandError)`, not `Response`.

/// Command execution response with message and formatting flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    /// Response message (may span several lines, may be empty)
    pub message: String,

    /// Add a blank line before the message
    pub prefix_newline: bool,

    /// Indent every line of the message by 2 spaces
    pub indent_message: bool,

    /// Keep the input line that produced this response out of history
    pub exclude_from_history: bool,
}

impl Response {
    /// Create success response with default formatting.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    /// Success response that prints nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builder method to keep the input out of history (chainable).
    ///
    /// Use for commands handling sensitive data (tokens, credentials).
    pub fn without_history(mut self) -> Self {
        self.exclude_from_history = true;
        self
    }

    /// Builder method to add blank line before response.
    pub fn with_prefix_newline(mut self) -> Self {
        self.prefix_newline = true;
        self
    }

    /// Builder method to indent response (2 spaces per line).
    pub fn indented(mut self) -> Self {
        self.indent_message = true;
        self
    }

    /// Render the message with all formatting flags applied.
    ///
    /// Returns `None` when there is nothing to print.
    pub fn render(&self) -> Option<String> {
        if self.message.is_empty() {
            return None;
        }

        let mut out = String::new();
        if self.prefix_newline {
            out.push('\n');
        }
        if self.indent_message {
            let lines: Vec<String> = self.message.lines().map(|l| format!("  {}", l)).collect();
            out.push_str(&lines.join("\n"));
        } else {
            out.push_str(&self.message);
        }
        Some(out)
    }
}

impl From<String> for Response {
    fn from(message: String) -> Self {
        Response::success(message)
    }
}

impl From<&str> for Response {
    fn from(message: &str) -> Self {
        Response::success(message)
    }
}
