//! Command registry data model.
//!
//! The registry is split the same way as metadata and execution:
//! - [`CommandSpec`] / [`FlagSpec`] describe a command (read-only to the shell)
//! - [`CommandCatalog`] answers lookups and renders help (used by routing and completion)
//! - [`CommandRegistry`] runs a command against the session's persistent instance
//!
//! [`CommandTable`] is the built-in registry: specs and handlers are resolved
//! into a name-keyed table once, when the table is built.

use crate::error::CommandError;
use crate::flags::{FlagSpec, FlagValues};
use crate::response::Response;

pub mod table;

pub use table::CommandTable;

/// Declaration of one command.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandSpec {
    /// Unique command name
    pub name: String,

    /// One-line description (shown in help)
    pub description: String,

    /// Number of required positional arguments
    pub required: usize,

    /// Number of optional positional arguments after the required ones
    pub optional: usize,

    /// Accepts any number of trailing positionals
    pub variadic: bool,

    /// Declared flags, in help order
    pub flags: Vec<FlagSpec>,

    /// Receives the rest of the line as one untokenized argument
    pub free_text: bool,

    /// Flags whose values complete as paths; `None` uses the configured defaults
    pub path_flags: Option<Vec<String>>,

    /// Placeholder names for positionals in usage output
    pub arg_names: Vec<String>,
}

impl CommandSpec {
    /// Command taking no arguments and no flags.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: String::new(),
            required: 0,
            optional: 0,
            variadic: false,
            flags: Vec::new(),
            free_text: false,
            path_flags: None,
            arg_names: Vec::new(),
        }
    }

    /// Set the description.
    pub fn describe(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// Set required and optional positional counts.
    pub fn args(mut self, required: usize, optional: usize) -> Self {
        self.required = required;
        self.optional = optional;
        self
    }

    /// Name the positionals for usage output.
    pub fn arg_names(mut self, names: &[&str]) -> Self {
        self.arg_names = names.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Accept any number of trailing positionals.
    pub fn variadic(mut self) -> Self {
        self.variadic = true;
        self
    }

    /// Add a flag.
    pub fn flag(mut self, flag: FlagSpec) -> Self {
        self.flags.push(flag);
        self
    }

    /// Take the rest of the line as one opaque text argument.
    ///
    /// Free-text commands have exactly one required positional and no flags.
    pub fn free_text(mut self) -> Self {
        self.free_text = true;
        self.required = 1;
        self.optional = 0;
        self.variadic = false;
        self.flags.clear();
        self
    }

    /// Replace the default path-flag list for completion.
    pub fn path_flags(mut self, flags: &[&str]) -> Self {
        self.path_flags = Some(flags.iter().map(|s| s.to_string()).collect());
        self
    }

    /// Maximum positional count (`None` when variadic).
    pub fn max_args(&self) -> Option<usize> {
        if self.variadic {
            None
        } else {
            Some(self.required + self.optional)
        }
    }

    /// Find a flag by long name, `--long`, or `-s` form.
    pub fn find_flag(&self, token: &str) -> Option<&FlagSpec> {
        if let Some(long) = token.strip_prefix("--") {
            return self.flags.iter().find(|f| f.name == long);
        }
        if let Some(short) = token.strip_prefix('-') {
            let mut chars = short.chars();
            let c = chars.next()?;
            if chars.next().is_some() {
                return None;
            }
            return self.flags.iter().find(|f| f.short == Some(c));
        }
        self.flags.iter().find(|f| f.name == token)
    }

    /// All spellings of all flags (`--long` and `-s`).
    pub fn flag_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        for flag in &self.flags {
            names.push(flag.long());
            if let Some(short) = flag.short_form() {
                names.push(short);
            }
        }
        names
    }

    /// Whether the value after `flag_token` completes as a path.
    ///
    /// True for flags declared with [`FlagSpec::path`] and for flags in this
    /// command's `path_flags` (or `defaults` when it has none).
    pub fn takes_path_value(&self, flag_token: &str, defaults: &[String]) -> bool {
        let flag_token = flag_token.split('=').next().unwrap_or(flag_token);
        if self.find_flag(flag_token).is_some_and(|f| f.path) {
            return true;
        }
        let list = self.path_flags.as_deref().unwrap_or(defaults);
        list.iter().any(|f| f == flag_token)
    }

    /// One-line usage, e.g. `process <file> [--flags]`.
    pub fn usage(&self) -> String {
        let mut usage = self.name.clone();
        if self.free_text {
            let name = self.arg_names.first().map(String::as_str).unwrap_or("text");
            usage.push_str(&format!(" <{}...>", name));
            return usage;
        }

        for i in 0..self.required + self.optional {
            let name = self
                .arg_names
                .get(i)
                .cloned()
                .unwrap_or_else(|| format!("arg{}", i + 1));
            if i < self.required {
                usage.push_str(&format!(" <{}>", name));
            } else {
                usage.push_str(&format!(" [{}]", name));
            }
        }
        if self.variadic {
            usage.push_str(" [args...]");
        }
        if !self.flags.is_empty() {
            usage.push_str(" [flags]");
        }
        usage
    }
}

/// A command call after tokenizing and flag parsing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedInvocation {
    /// Command name as resolved in the registry
    pub name: String,

    /// Positional arguments in order
    pub positionals: Vec<String>,

    /// Parsed flag values
    pub flags: FlagValues,
}

impl ParsedInvocation {
    /// Positional argument by index.
    pub fn arg(&self, index: usize) -> Option<&str> {
        self.positionals.get(index).map(String::as_str)
    }

    /// The single text argument of a free-text command (empty when absent).
    pub fn text(&self) -> &str {
        self.arg(0).unwrap_or("")
    }
}

/// Read-only view of the available commands.
pub trait CommandCatalog {
    /// All commands, sorted by name.
    fn commands(&self) -> Vec<&CommandSpec>;

    /// Look up a command by exact name.
    fn lookup(&self, name: &str) -> Option<&CommandSpec>;

    /// Render help for one command, or the command list when `name` is `None`.
    fn render_help(&self, name: Option<&str>) -> String {
        match name {
            None => render_command_list(&self.commands()),
            Some(name) => match self.lookup(name) {
                Some(spec) => render_command_help(spec),
                None => format!("Unknown command '{}'", name),
            },
        }
    }
}

/// Executes commands against the session's persistent instance `I`.
pub trait CommandRegistry<I>: CommandCatalog {
    /// Run the command named in `call`.
    ///
    /// `instance` is the same object for every call of a session; mutations
    /// are visible to later commands.
    fn invoke(&self, instance: &mut I, call: &ParsedInvocation) -> Result<Response, CommandError>;
}

fn render_command_list(commands: &[&CommandSpec]) -> String {
    if commands.is_empty() {
        return "No commands available".to_string();
    }

    let width = commands.iter().map(|c| c.name.len()).max().unwrap_or(0);
    let mut lines = vec!["Available commands:".to_string()];
    for spec in commands {
        if spec.description.is_empty() {
            lines.push(format!("  {}", spec.name));
        } else {
            lines.push(format!("  {:width$}  - {}", spec.name, spec.description, width = width));
        }
    }
    lines.join("\n")
}

fn render_command_help(spec: &CommandSpec) -> String {
    let mut lines = vec![format!("Usage: {}", spec.usage())];
    if !spec.description.is_empty() {
        lines.push(format!("  {}", spec.description));
    }

    if !spec.flags.is_empty() {
        lines.push(String::new());
        lines.push("Flags:".to_string());
        let usages: Vec<String> = spec.flags.iter().map(|f| f.usage()).collect();
        let width = usages.iter().map(String::len).max().unwrap_or(0);
        for (flag, usage) in spec.flags.iter().zip(&usages) {
            let mut line = format!("  {:width$}", usage, width = width);
            if !flag.description.is_empty() {
                line.push_str("  ");
                line.push_str(&flag.description);
            }
            if let Some(choices) = &flag.choices {
                line.push_str(&format!(" [{}]", choices.join(", ")));
            }
            if flag.required {
                line.push_str(" (required)");
            }
            lines.push(line.trim_end().to_string());
        }
    }
    lines.join("\n")
}
