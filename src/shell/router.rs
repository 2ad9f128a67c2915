//! Input classification.
//!
//! Decides what a line means before anything runs. Rules, first match wins:
//! 1. Blank line: nothing
//! 2. Exit keyword (`exit`, `quit`, `q`; any case, marker optional): exit
//! 3. Marker-prefixed line: command (or help when the name is a help keyword)
//! 4. First word is a registered command: command, even without the marker
//! 5. Help keyword alone or with one argument: help
//! 6. Default handler configured: the whole line goes to it
//! 7. Otherwise: rejected with a hint about command syntax

use crate::registry::CommandCatalog;
use crate::shell::tokenizer::split_command;

/// Words that end the session.
pub const EXIT_KEYWORDS: &[&str] = &["exit", "quit", "q"];

/// Words that show help.
pub const HELP_KEYWORDS: &[&str] = &["help", "?"];

/// What to do with one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Blank input
    Noop,

    /// End the session
    Exit,

    /// Run a command with the raw remainder of the line
    Invoke {
        /// Command name as typed (marker stripped)
        name: String,
        /// Everything after the name, leading whitespace removed
        rest: String,
    },

    /// Show the command list, or help for one command
    ShowHelp(Option<String>),

    /// Hand the original line to the default handler
    SendToDefault(String),

    /// Not understood; the message says how to run a command
    Reject(String),
}

/// Line classifier for one session.
#[derive(Debug, Clone)]
pub struct Router {
    marker: char,
    has_default_handler: bool,
}

impl Router {
    /// Router using `marker` for explicit commands.
    pub fn new(marker: char) -> Self {
        Self {
            marker,
            has_default_handler: false,
        }
    }

    /// Whether unmatched lines go to a default handler.
    pub fn with_default_handler(mut self, enabled: bool) -> Self {
        self.has_default_handler = enabled;
        self
    }

    /// Classify `line`.
    pub fn route(&self, catalog: &dyn CommandCatalog, line: &str) -> Action {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Action::Noop;
        }

        let unmarked = trimmed.strip_prefix(self.marker);
        let keyword = unmarked.unwrap_or(trimmed).trim();
        if EXIT_KEYWORDS.iter().any(|k| k.eq_ignore_ascii_case(keyword)) {
            return Action::Exit;
        }

        if let Some(body) = unmarked {
            let (name, rest) = split_command(body);
            if name.is_empty() {
                return Action::ShowHelp(None);
            }
            if catalog.lookup(name).is_none() && is_help_keyword(name) {
                return Action::ShowHelp(help_topic(rest));
            }
            log::debug!("explicit command '{}'", name);
            return Action::Invoke {
                name: name.to_string(),
                rest: rest.to_string(),
            };
        }

        let (first, rest) = split_command(trimmed);
        if catalog.lookup(first).is_some() {
            log::debug!("bare command '{}'", first);
            return Action::Invoke {
                name: first.to_string(),
                rest: rest.to_string(),
            };
        }

        if is_help_keyword(first) && rest.split_whitespace().count() <= 1 {
            return Action::ShowHelp(help_topic(rest));
        }

        if self.has_default_handler {
            log::debug!("no command matched, forwarding to default handler");
            return Action::SendToDefault(line.trim().to_string());
        }

        Action::Reject(format!(
            "Unrecognized input. Use {}<command> to run a command, or 'help' to list commands.",
            self.marker
        ))
    }
}

fn is_help_keyword(word: &str) -> bool {
    HELP_KEYWORDS.iter().any(|k| k.eq_ignore_ascii_case(word))
}

fn help_topic(rest: &str) -> Option<String> {
    rest.split_whitespace().next().map(str::to_string)
}
