//! Built-in command registry.
//!
//! Commands are registered with their spec and a handler closure; the table is
//! keyed by name so dispatch is a single map lookup.

use super::{CommandCatalog, CommandRegistry, CommandSpec, ParsedInvocation};
use crate::error::CommandError;
use crate::response::Response;
use std::collections::BTreeMap;

/// Handler run for one command against the persistent instance `I`.
pub type Handler<I> = Box<dyn Fn(&mut I, &ParsedInvocation) -> Result<Response, CommandError>>;

struct Entry<I> {
    spec: CommandSpec,
    handler: Handler<I>,
}

/// Name-keyed table of command specs and handlers.
///
/// # Example
///
/// ```rust,ignore
/// struct Notes { items: Vec<String> }
///
/// let table = CommandTable::new()
///     .command(CommandSpec::new("add").free_text(), |notes: &mut Notes, call| {
///         notes.items.push(call.text().to_string());
///         Ok(Response::success(format!("Added: {}", call.text())))
///     })
///     .command(CommandSpec::new("count"), |notes: &mut Notes, _| {
///         Ok(Response::success(format!("{} notes", notes.items.len())))
///     });
/// ```
pub struct CommandTable<I> {
    entries: BTreeMap<String, Entry<I>>,
}

impl<I> CommandTable<I> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Register a command. A later registration with the same name replaces
    /// the earlier one.
    pub fn command<F>(mut self, spec: CommandSpec, handler: F) -> Self
    where
        F: Fn(&mut I, &ParsedInvocation) -> Result<Response, CommandError> + 'static,
    {
        if self.entries.contains_key(&spec.name) {
            log::warn!("command '{}' registered twice, keeping the last one", spec.name);
        }
        self.entries.insert(
            spec.name.clone(),
            Entry {
                spec,
                handler: Box::new(handler),
            },
        );
        self
    }

    /// Number of registered commands.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no commands are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<I> Default for CommandTable<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I> core::fmt::Debug for CommandTable<I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CommandTable")
            .field("commands", &self.entries.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl<I> CommandCatalog for CommandTable<I> {
    fn commands(&self) -> Vec<&CommandSpec> {
        self.entries.values().map(|entry| &entry.spec).collect()
    }

    fn lookup(&self, name: &str) -> Option<&CommandSpec> {
        self.entries.get(name).map(|entry| &entry.spec)
    }
}

impl<I> CommandRegistry<I> for CommandTable<I> {
    fn invoke(&self, instance: &mut I, call: &ParsedInvocation) -> Result<Response, CommandError> {
        match self.entries.get(&call.name) {
            Some(entry) => (entry.handler)(instance, call),
            None => Err(CommandError::failed(format!("Unknown command '{}'", call.name))),
        }
    }
}
