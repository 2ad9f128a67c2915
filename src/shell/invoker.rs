//! Command invocation and failure classification.
//!
//! Turns a routed `(name, rest)` pair into a call on the registry:
//! 1. Resolve the name; unknown names stop here
//! 2. Free-text commands get `rest` as their single argument, untouched
//! 3. Otherwise tokenize, run the flag parser when flags are declared, and
//!    check the positional count
//! 4. Run the command against the persistent instance, catching panics
//!
//! Nothing that goes wrong here escapes as an error or a panic. Every result
//! is an [`InvocationOutcome`] the session prints and moves past.

use crate::error::{CommandError, UsageError};
use crate::flags::{self, FlagValues};
use crate::registry::{CommandRegistry, CommandSpec, ParsedInvocation};
use crate::response::Response;
use crate::shell::tokenizer::tokenize;
use std::any::Any;
use std::error::Error as _;
use std::panic::{AssertUnwindSafe, catch_unwind};

/// Result of one invocation attempt.
#[derive(Debug)]
pub enum InvocationOutcome {
    /// Command ran and succeeded
    Completed(Response),

    /// No command with this name
    UnknownCommand(String),

    /// Arguments rejected; the command did not run
    Usage {
        /// What was wrong
        error: UsageError,
        /// One-line usage of the command
        usage: String,
    },

    /// Command ran and reported failure
    Failed(CommandError),

    /// Command asked to terminate the process with this code
    ExitRequested(i32),

    /// Command was abandoned after a user interrupt
    Interrupted,

    /// Command panicked
    Panicked {
        /// What was running (command name or "default handler")
        context: String,
        /// Panic payload, when it was a string
        message: String,
    },
}

impl InvocationOutcome {
    /// True when the command did not complete successfully.
    pub fn is_failure(&self) -> bool {
        !matches!(self, InvocationOutcome::Completed(_))
    }

    /// Whether the line that produced this outcome belongs in history.
    pub fn record_in_history(&self) -> bool {
        match self {
            InvocationOutcome::Completed(response) => !response.exclude_from_history,
            _ => true,
        }
    }

    /// Text to show the user, if any.
    ///
    /// Failures are a single `Error: ...` line. With `debug` set, the error
    /// source chain and panic payloads are appended.
    pub fn report(&self, debug: bool) -> Option<String> {
        match self {
            InvocationOutcome::Completed(response) => response.render(),
            InvocationOutcome::UnknownCommand(name) => Some(format!(
                "Error: Unknown command '{}'. Type 'help' to list commands.",
                name
            )),
            InvocationOutcome::Usage { error, usage } => {
                Some(format!("Error: {}. Usage: {}", error, usage))
            }
            InvocationOutcome::Failed(error) => {
                let mut line = format!("Error: {}", error);
                if debug {
                    let mut source = error.source();
                    while let Some(cause) = source {
                        line.push_str(&format!(" (caused by: {})", cause));
                        source = cause.source();
                    }
                }
                Some(line)
            }
            InvocationOutcome::ExitRequested(0) => {
                Some("Command requested exit with code 0 (would have succeeded).".to_string())
            }
            InvocationOutcome::ExitRequested(code) => Some(format!(
                "Error: command requested exit with code {} (session continues).",
                code
            )),
            InvocationOutcome::Interrupted => Some("Interrupted.".to_string()),
            InvocationOutcome::Panicked { context, message } => {
                if debug {
                    Some(format!("Error: {} panicked: {}", context, message))
                } else {
                    Some(format!("Error: {} failed unexpectedly.", context))
                }
            }
        }
    }
}

/// Resolve `name` and run it against `instance`.
pub fn invoke<I, R>(registry: &R, instance: &mut I, name: &str, rest: &str) -> InvocationOutcome
where
    R: CommandRegistry<I> + ?Sized,
{
    let Some(spec) = registry.lookup(name) else {
        return InvocationOutcome::UnknownCommand(name.to_string());
    };

    let call = match prepare(spec, rest) {
        Ok(call) => call,
        Err(error) => {
            log::debug!("'{}' rejected before running: {}", name, error);
            return InvocationOutcome::Usage {
                error,
                usage: spec.usage(),
            };
        }
    };

    guarded(&call.name, || registry.invoke(instance, &call))
}

/// Build the invocation for `spec` from the raw remainder of the line.
pub fn prepare(spec: &CommandSpec, rest: &str) -> Result<ParsedInvocation, UsageError> {
    let (positionals, flags) = if spec.free_text {
        let text = rest.trim();
        let positionals = if text.is_empty() {
            Vec::new()
        } else {
            vec![text.to_string()]
        };
        (positionals, FlagValues::new())
    } else {
        let tokens = tokenize(rest);
        if spec.flags.is_empty() {
            (tokens, FlagValues::new())
        } else {
            let parsed = flags::parse(&tokens, &spec.flags)?;
            (parsed.positionals, parsed.flags)
        }
    };

    let received = positionals.len();
    let too_many = spec.max_args().is_some_and(|max| received > max);
    if received < spec.required || too_many {
        return Err(UsageError::InvalidArgumentCount {
            expected_min: spec.required,
            expected_max: spec.max_args(),
            received,
        });
    }

    Ok(ParsedInvocation {
        name: spec.name.clone(),
        positionals,
        flags,
    })
}

/// Run `f`, converting its error or panic into an outcome.
pub fn guarded<F>(context: &str, f: F) -> InvocationOutcome
where
    F: FnOnce() -> Result<Response, CommandError>,
{
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(response)) => InvocationOutcome::Completed(response),
        Ok(Err(CommandError::Exit(code))) => {
            log::info!("{} requested exit with code {}", context, code);
            InvocationOutcome::ExitRequested(code)
        }
        Ok(Err(CommandError::Interrupted)) => InvocationOutcome::Interrupted,
        Ok(Err(error)) => InvocationOutcome::Failed(error),
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            log::error!("{} panicked: {}", context, message);
            InvocationOutcome::Panicked {
                context: context.to_string(),
                message,
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FlagError;
    use crate::flags::FlagSpec;
    use crate::registry::CommandTable;

    #[derive(Default)]
    struct Probe {
        calls: Vec<ParsedInvocation>,
    }

    fn registry() -> CommandTable<Probe> {
        let record = |p: &mut Probe, call: &ParsedInvocation| -> Result<Response, CommandError> {
            p.calls.push(call.clone());
            Ok(Response::success("ok"))
        };
        CommandTable::new()
            .command(CommandSpec::new("add").free_text(), record)
            .command(
                CommandSpec::new("process")
                    .args(1, 0)
                    .flag(FlagSpec::number("limit")),
                record,
            )
            .command(CommandSpec::new("echo").variadic(), record)
            .command(CommandSpec::new("quit-app"), |_: &mut Probe, _| {
                Err(CommandError::Exit(3))
            })
            .command(CommandSpec::new("boom"), |_: &mut Probe, _| panic!("kaboom"))
    }

    #[test]
    fn test_free_text_gets_single_argument() {
        let mut probe = Probe::default();
        let outcome = invoke(&registry(), &mut probe, "add", "Buy milk");
        assert!(!outcome.is_failure());
        assert_eq!(probe.calls[0].positionals, vec!["Buy milk"]);
    }

    #[test]
    fn test_flag_error_prevents_execution() {
        let mut probe = Probe::default();
        let outcome = invoke(&registry(), &mut probe, "process", "file.txt --limit abc");
        match &outcome {
            InvocationOutcome::Usage {
                error: UsageError::Flags(FlagError::InvalidNumber { flag, .. }),
                ..
            } => assert_eq!(flag, "--limit"),
            other => panic!("unexpected {:?}", other),
        }
        assert!(outcome.report(false).unwrap().contains("--limit"));
        assert!(probe.calls.is_empty());
    }

    #[test]
    fn test_arity_checked() {
        let mut probe = Probe::default();
        let outcome = invoke(&registry(), &mut probe, "add", "   ");
        assert!(matches!(outcome, InvocationOutcome::Usage { .. }));
        let outcome = invoke(&registry(), &mut probe, "process", "a b");
        assert_eq!(
            outcome.report(false).as_deref(),
            Some("Error: Expected 1 arguments, got 2. Usage: process <arg1> [flags]")
        );
        assert!(probe.calls.is_empty());
    }

    #[test]
    fn test_malformed_quotes_still_run() {
        let mut probe = Probe::default();
        let outcome = invoke(&registry(), &mut probe, "echo", "\"unterminated text");
        assert!(!outcome.is_failure());
        assert_eq!(probe.calls[0].positionals, vec!["\"unterminated", "text"]);
    }

    #[test]
    fn test_unknown_command() {
        let outcome = invoke(&registry(), &mut Probe::default(), "nope", "");
        assert!(matches!(outcome, InvocationOutcome::UnknownCommand(ref n) if n == "nope"));
    }

    #[test]
    fn test_exit_request_intercepted() {
        let outcome = invoke(&registry(), &mut Probe::default(), "quit-app", "");
        assert!(matches!(outcome, InvocationOutcome::ExitRequested(3)));
        assert!(outcome.report(false).unwrap().starts_with("Error:"));
        let ok = guarded("x", || Err(CommandError::Exit(0)));
        assert!(ok.report(false).unwrap().contains("would have succeeded"));
    }

    #[test]
    fn test_panic_caught() {
        let outcome = invoke(&registry(), &mut Probe::default(), "boom", "");
        assert!(matches!(outcome, InvocationOutcome::Panicked { .. }));
        assert_eq!(
            outcome.report(false).as_deref(),
            Some("Error: boom failed unexpectedly.")
        );
        assert_eq!(
            outcome.report(true).as_deref(),
            Some("Error: boom panicked: kaboom")
        );
    }

    #[test]
    fn test_history_exclusion() {
        let outcome = guarded("secret", || Ok(Response::success("set").without_history()));
        assert!(!outcome.record_in_history());
        assert!(InvocationOutcome::Interrupted.record_in_history());
    }
}
