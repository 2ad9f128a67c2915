//! Interactive session loop.
//!
//! The `Session` struct brings the pieces together: it reads a line, routes
//! it, invokes the command (or the default handler) against the persistent
//! instance, prints the outcome, and repeats until an exit keyword, end of
//! input, or a double interrupt.
//!
//! Every error inside one iteration is reported and the loop continues. Only
//! [`CliError`] (line reader failure, denied nesting) ends [`Session::run`]
//! with an error.

#[cfg(feature = "completion")]
use crate::completion::CompletionEngine;
use crate::config::ShellConfig;
use crate::error::CliError;
use crate::io::{LineIo, LoopOutcome};
use crate::registry::CommandRegistry;
use crate::response::Response;
use std::rc::Rc;
use std::time::Instant;

// Sub-modules
pub mod context;
pub mod handler;
pub mod history;
pub mod interrupt;
pub mod invoker;
pub mod router;
pub mod tokenizer;

// Re-export key types
pub use context::{DepthGuard, InterruptWatch, SessionContext};
pub use handler::DefaultHandler;
pub use history::CommandHistory;
pub use interrupt::{InterruptAction, InterruptPolicy};
pub use invoker::InvocationOutcome;
pub use router::{Action, Router};

/// Why a session ended.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SessionEnd {
    /// Exit keyword (`exit`, `quit`, `q`)
    ExitCommand,

    /// Input closed (Ctrl-D)
    Eof,

    /// Two interrupts inside the timeout window
    Interrupted,
}

/// Interactive session over a command registry.
///
/// Generic over:
/// - `I`: the persistent instance every command runs against
/// - `R`: the command registry
/// - `IO`: the line reader
///
/// # Example
///
/// ```rust,ignore
/// let registry = Rc::new(CommandTable::new().command(/* ... */));
/// let mut session = Session::new(registry, Notes::default(), EditorIo::new()?,
///     ShellConfig::default(), SessionContext::from_env())
///     .with_default_handler(|line: &str, _: &mut Notes| -> Result<Response, CommandError> {
///         Ok(Response::success(line))
///     });
/// session.run()?;
/// ```
pub struct Session<I, R, IO>
where
    R: CommandRegistry<I>,
    IO: LineIo,
{
    /// Command registry, shared with the completion callback
    registry: Rc<R>,

    /// The single instance every command of this session runs against
    instance: I,

    /// Line reader
    io: IO,

    /// Session configuration
    config: ShellConfig,

    /// Nesting depth shared with enclosing and nested sessions
    context: SessionContext,

    /// Receives lines that are not commands
    default_handler: Option<Box<dyn DefaultHandler<I>>>,

    /// Line classifier
    router: Router,

    /// Double-interrupt tracking
    interrupts: InterruptPolicy,

    /// Lines entered this session, after any loaded from disk
    history: CommandHistory,

    /// Number of leading history lines that came from the history file
    loaded_lines: usize,
}

// ============================================================================
// Debug implementation
// ============================================================================

impl<I, R, IO> core::fmt::Debug for Session<I, R, IO>
where
    R: CommandRegistry<I>,
    IO: LineIo,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut debug_struct = f.debug_struct("Session");
        debug_struct
            .field("config", &self.config)
            .field("depth", &self.context.depth())
            .field("history_len", &self.history.len());

        if self.default_handler.is_some() {
            debug_struct.field("default_handler", &"<dyn DefaultHandler>");
        } else {
            debug_struct.field("default_handler", &"None");
        }

        debug_struct.finish_non_exhaustive()
    }
}

// ============================================================================
// Constructors and accessors
// ============================================================================

impl<I, R, IO> Session<I, R, IO>
where
    R: CommandRegistry<I> + 'static,
    IO: LineIo,
{
    /// Create a session. Nothing is read until [`Session::run`].
    ///
    /// `instance` is created once by the caller and used for every command.
    pub fn new(
        registry: Rc<R>,
        instance: I,
        io: IO,
        config: ShellConfig,
        context: SessionContext,
    ) -> Self {
        let router = Router::new(config.command_marker);
        let interrupts =
            InterruptPolicy::new(config.interrupt_behavior, config.interrupt_timeout());
        Self {
            registry,
            instance,
            io,
            config,
            context,
            default_handler: None,
            router,
            interrupts,
            history: CommandHistory::new(),
            loaded_lines: 0,
        }
    }

    /// Send lines that match no command to `handler` instead of rejecting them.
    pub fn with_default_handler<H>(mut self, handler: H) -> Self
    where
        H: DefaultHandler<I> + 'static,
    {
        self.default_handler = Some(Box::new(handler));
        self.router = self.router.with_default_handler(true);
        self
    }

    /// The persistent instance.
    pub fn instance(&self) -> &I {
        &self.instance
    }

    /// Mutable access to the persistent instance.
    pub fn instance_mut(&mut self) -> &mut I {
        &mut self.instance
    }

    /// End the session and return the instance.
    pub fn into_instance(self) -> I {
        self.instance
    }

    /// The line reader.
    pub fn io(&self) -> &IO {
        &self.io
    }

    /// Mutable access to the line reader.
    pub fn io_mut(&mut self) -> &mut IO {
        &mut self.io
    }

    /// Nesting context shared with nested sessions.
    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    /// History of this session (loaded lines first).
    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    /// Session configuration.
    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    // ========================================================================
    // Session loop
    // ========================================================================

    /// Run the read/process loop until the session ends.
    ///
    /// On return the nesting depth is back to its value before the call,
    /// history has been saved and the farewell printed.
    ///
    /// # Errors
    ///
    /// - [`CliError::NestedSessionDenied`] when already inside a session and
    ///   `allow_nested` is off
    /// - [`CliError::Readline`] / [`CliError::Io`] when the line reader fails
    pub fn run(&mut self) -> Result<SessionEnd, CliError> {
        if self.context.in_session() && !self.config.allow_nested {
            return Err(CliError::NestedSessionDenied {
                depth: self.context.depth(),
            });
        }

        let watch = self.context.watch_interrupts()?;
        let guard = self.context.enter();
        let depth = guard.level();
        log::info!("session started (depth {})", depth);

        self.load_history();
        self.install_completion();

        let result = self.run_loop(depth);

        self.save_history();
        let farewell = if depth > 1 {
            format!("Leaving nested session (depth {}).", depth)
        } else {
            "Goodbye!".to_string()
        };
        let farewell_result = self.io.write_line(&farewell);

        drop(guard);
        drop(watch);
        log::info!("session ended (depth {}): {:?}", depth, result);

        let end = result?;
        farewell_result?;
        Ok(end)
    }

    fn run_loop(&mut self, depth: usize) -> Result<SessionEnd, CliError> {
        if let Some(welcome) = self.config.welcome.clone() {
            self.io.write_line(&welcome)?;
        }

        loop {
            let prompt = self.prompt(depth);
            match self.io.read_line(&prompt)? {
                LoopOutcome::Eof => {
                    self.io.write_line("")?;
                    return Ok(SessionEnd::Eof);
                }
                LoopOutcome::Interrupted => {
                    if self.handle_interrupt()? {
                        return Ok(SessionEnd::Interrupted);
                    }
                }
                LoopOutcome::Line(line) => {
                    self.interrupts.reset();
                    if self.process_line(&line)? {
                        return Ok(SessionEnd::ExitCommand);
                    }
                }
            }
        }
    }

    /// Prompt for the given depth; nested sessions show `[depth] `.
    pub fn prompt(&self, depth: usize) -> String {
        if depth > 1 {
            format!("[{}] {}", depth, self.config.prompt)
        } else {
            self.config.prompt.clone()
        }
    }

    /// Returns true when the interrupt ends the session.
    fn handle_interrupt(&mut self) -> Result<bool, CliError> {
        match self.interrupts.on_interrupt(Instant::now()) {
            InterruptAction::Exit => {
                self.io.write_line("")?;
                Ok(true)
            }
            InterruptAction::ClearLine => {
                self.io.write_line("(Press Ctrl-C again to exit, or type 'exit')")?;
                Ok(false)
            }
            InterruptAction::ShowHelp => {
                self.io.write_line(&format!(
                    "Type 'help' for commands, {}<command> to run one, 'exit' to leave.",
                    self.config.command_marker
                ))?;
                Ok(false)
            }
            InterruptAction::Ignore => Ok(false),
        }
    }

    /// Route and execute one line. Returns true when the line ends the session.
    pub fn process_line(&mut self, line: &str) -> Result<bool, CliError> {
        let action = self.router.route(self.registry.as_ref(), line);
        log::debug!("routed {:?} -> {:?}", line, action);

        let outcome = match action {
            Action::Noop => return Ok(false),
            Action::Exit => return Ok(true),
            Action::Reject(message) => {
                self.io.write_line(&format!("Error: {}", message))?;
                self.record(line);
                return Ok(false);
            }
            Action::ShowHelp(topic) => {
                InvocationOutcome::Completed(Response::success(self.help_text(topic.as_deref())))
            }
            Action::Invoke { name, rest } => {
                self.context.take_interrupt();
                let outcome =
                    invoker::invoke(self.registry.as_ref(), &mut self.instance, &name, &rest);
                self.interrupt_aware(outcome)
            }
            Action::SendToDefault(text) => match &self.default_handler {
                Some(handler) => {
                    self.context.take_interrupt();
                    let outcome = invoker::guarded("default handler", || {
                        handler.handle(&text, &mut self.instance)
                    });
                    self.interrupt_aware(outcome)
                }
                None => InvocationOutcome::UnknownCommand(text),
            },
        };

        if let Some(report) = outcome.report(self.config.debug) {
            self.io.write_line(&report)?;
        }
        if outcome.record_in_history() {
            self.record(line);
        }
        Ok(false)
    }

    /// A Ctrl-C that arrived while the command ran overrides its outcome.
    fn interrupt_aware(&self, outcome: InvocationOutcome) -> InvocationOutcome {
        if self.context.take_interrupt() {
            log::info!("command interrupted, discarding {:?}", outcome);
            InvocationOutcome::Interrupted
        } else {
            outcome
        }
    }

    fn help_text(&self, topic: Option<&str>) -> String {
        match topic {
            Some(name) if self.registry.lookup(name).is_none() => format!(
                "Unknown command '{}'. Type 'help' to list commands.",
                name
            ),
            Some(name) => self.registry.render_help(Some(name)),
            None => format!(
                "{}\n\nRun a command with or without '{}' (e.g. {}help). \
                 Type 'exit', 'quit' or 'q' to leave.",
                self.registry.render_help(None),
                self.config.command_marker,
                self.config.command_marker
            ),
        }
    }

    fn record(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }
        self.history.add(line);
        self.io.add_history(line);
    }

    // ========================================================================
    // Session boundaries
    // ========================================================================

    fn load_history(&mut self) {
        let Some(path) = &self.config.history_file else {
            return;
        };
        let lines = history::load_lines(path);
        log::debug!("loaded {} history lines from {}", lines.len(), path.display());
        for line in &lines {
            self.io.add_history(line);
        }
        self.history = CommandHistory::from_lines(lines);
        self.loaded_lines = self.history.len();
    }

    /// Append this session's lines to whatever the file holds now (a nested
    /// session may have written to it meanwhile), then persist.
    fn save_history(&self) {
        let Some(path) = &self.config.history_file else {
            return;
        };
        let new_lines = self.history.lines().get(self.loaded_lines..).unwrap_or(&[]);
        if new_lines.is_empty() {
            return;
        }
        let mut merged = history::load_lines(path);
        merged.extend(new_lines.iter().cloned());
        let lines = CommandHistory::from_lines(merged).persistable(self.config.history_size);
        history::save_lines(path, &lines);
    }

    #[cfg(feature = "completion")]
    fn install_completion(&mut self) {
        let registry = Rc::clone(&self.registry);
        let engine = CompletionEngine::new(&self.config);
        self.io.set_completion(Box::new(move |line: &str, pos: usize| {
            engine.complete_at(registry.as_ref(), line, pos)
        }));
    }

    #[cfg(not(feature = "completion"))]
    fn install_completion(&mut self) {}
}
