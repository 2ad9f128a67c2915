//! Test fixtures and utilities for shellkit testing.
//!
//! Provides:
//! - `ScriptedIo`: Test implementation of the LineIo trait
//! - `Notebook`: Persistent instance used by the test registry
//! - `Format`: Choice enum for enum-restricted flags
//! - `test_registry()`: Command table covering every calling convention

#![allow(dead_code)]

use shellkit::io::CompletionFn;
use shellkit::{
    Choice, CliError, Completion, CommandError, CommandSpec, CommandTable, FlagSpec, FlagValue,
    LineIo, LoopOutcome, ParsedInvocation, Response, Session, SessionContext, ShellConfig,
};
use std::collections::VecDeque;
use std::rc::Rc;

// ============================================================================
// ScriptedIo - Test I/O Implementation
// ============================================================================

/// Scripted line reader for testing.
///
/// Replays queued read outcomes and captures everything written. Once the
/// script runs out every read returns `Eof`.
pub struct ScriptedIo {
    /// Pending read outcomes (simulates the user)
    script: VecDeque<LoopOutcome>,

    /// Output capture
    output: String,

    /// Prompts shown, in order
    prompts: Vec<String>,

    /// Lines passed to `add_history`
    recalled: Vec<String>,

    /// Installed completion callback
    completion: Option<CompletionFn>,
}

impl ScriptedIo {
    /// Reader that yields `lines` and then end of input.
    pub fn new(lines: &[&str]) -> Self {
        Self::with_script(
            lines
                .iter()
                .map(|line| LoopOutcome::Line(line.to_string()))
                .collect(),
        )
    }

    /// Reader replaying an explicit script.
    pub fn with_script(script: Vec<LoopOutcome>) -> Self {
        Self {
            script: script.into(),
            output: String::new(),
            prompts: Vec::new(),
            recalled: Vec::new(),
            completion: None,
        }
    }

    /// Queue one more line.
    pub fn push_line(&mut self, line: &str) {
        self.script.push_back(LoopOutcome::Line(line.to_string()));
    }

    /// Queue a Ctrl-C.
    pub fn push_interrupt(&mut self) {
        self.script.push_back(LoopOutcome::Interrupted);
    }

    /// Everything written so far.
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Output split into lines.
    pub fn output_lines(&self) -> Vec<&str> {
        self.output.lines().collect()
    }

    /// Clear captured output.
    pub fn clear_output(&mut self) {
        self.output.clear();
    }

    /// Prompts shown so far.
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    /// Lines handed to the reader's recall list.
    pub fn recalled(&self) -> &[String] {
        &self.recalled
    }

    /// Ask the installed completion callback, as a Tab press at `pos` would.
    pub fn complete(&self, line: &str, pos: usize) -> Option<Completion> {
        self.completion.as_ref().map(|complete| complete(line, pos))
    }
}

impl core::fmt::Debug for ScriptedIo {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ScriptedIo")
            .field("pending", &self.script.len())
            .field("output", &self.output)
            .finish_non_exhaustive()
    }
}

impl LineIo for ScriptedIo {
    fn read_line(&mut self, prompt: &str) -> Result<LoopOutcome, CliError> {
        self.prompts.push(prompt.to_string());
        Ok(self.script.pop_front().unwrap_or(LoopOutcome::Eof))
    }

    fn write_str(&mut self, s: &str) -> Result<(), CliError> {
        self.output.push_str(s);
        Ok(())
    }

    fn add_history(&mut self, line: &str) {
        self.recalled.push(line.to_string());
    }

    fn set_completion(&mut self, completion: CompletionFn) {
        self.completion = Some(completion);
    }
}

// ============================================================================
// Notebook - Persistent Instance
// ============================================================================

/// Output format for `process`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Choice)]
pub enum Format {
    Text,
    Json,
    JsonLines,
}

/// State carried across commands of one session.
#[derive(Debug, Default)]
pub struct Notebook {
    /// Incremented by `count`
    pub counter: u32,

    /// Appended by `add`
    pub items: Vec<String>,

    /// Lines received by the default handler
    pub unmatched: Vec<String>,

    /// Every `ParsedInvocation` of `process`
    pub processed: Vec<ParsedInvocation>,

    /// Depths observed by `depth`
    pub depths: Vec<usize>,

    /// Context shared with nested sessions
    pub context: SessionContext,

    /// Lines the `nest` command feeds to its nested session
    pub nested_script: Vec<String>,

    /// Output of the last nested session
    pub nested_output: String,

    /// Depths observed inside the last nested session
    pub nested_depths: Vec<usize>,

    /// Config for nested sessions
    pub nested_config: Option<ShellConfig>,
}

impl Notebook {
    /// Instance bound to `context`.
    pub fn new(context: SessionContext) -> Self {
        Self {
            context,
            ..Self::default()
        }
    }
}

// ============================================================================
// Test Registry
// ============================================================================

/// Command table used by the session tests.
///
/// - `count`: increments `counter`, prints `Count: N`
/// - `add <text...>`: free text, appended to `items`
/// - `list`: prints items
/// - `process <file> [--limit N] [--format F] [--tags ...] [--output P] [-v]`
/// - `echo [args...]`: prints tokenized arguments joined by `|`
/// - `fail`, `boom`, `exit-code <n>`, `stop`, `cancel`: failure modes
/// - `secret <token>`: kept out of history
/// - `depth`, `nest`: nesting probes
pub fn test_registry() -> CommandTable<Notebook> {
    CommandTable::new()
        .command(
            CommandSpec::new("count").describe("Increment the counter"),
            |nb: &mut Notebook, _| {
                nb.counter += 1;
                Ok(Response::success(format!("Count: {}", nb.counter)))
            },
        )
        .command(
            CommandSpec::new("add").describe("Add an item").free_text(),
            |nb: &mut Notebook, call| {
                nb.items.push(call.text().to_string());
                Ok(Response::success(format!("Added: {}", call.text())))
            },
        )
        .command(
            CommandSpec::new("list").describe("List items"),
            |nb: &mut Notebook, _| Ok(Response::success(nb.items.join("\n")).indented()),
        )
        .command(
            CommandSpec::new("process")
                .describe("Process a file")
                .args(1, 0)
                .arg_names(&["file"])
                .flag(FlagSpec::number("limit").short('l'))
                .flag(FlagSpec::choice::<Format>("format").default_value(FlagValue::Str("text".into())))
                .flag(FlagSpec::array("tags").short('t'))
                .flag(FlagSpec::string("output").short('o'))
                .flag(FlagSpec::boolean("verbose").short('v')),
            |nb: &mut Notebook, call| {
                nb.processed.push(call.clone());
                Ok(Response::success(format!("Processed {}", call.text())))
            },
        )
        .command(
            CommandSpec::new("echo").describe("Echo arguments").variadic(),
            |_: &mut Notebook, call| Ok(Response::success(call.positionals.join("|"))),
        )
        .command(CommandSpec::new("fail"), |_: &mut Notebook, _| {
            Err(CommandError::failed("something broke"))
        })
        .command(CommandSpec::new("boom"), |_: &mut Notebook, _| {
            panic!("command exploded")
        })
        .command(
            CommandSpec::new("exit-code").args(1, 0),
            |_: &mut Notebook, call| {
                let code = call.text().parse::<i32>().unwrap_or(1);
                Err(CommandError::Exit(code))
            },
        )
        .command(CommandSpec::new("stop"), |_: &mut Notebook, _| {
            Err(CommandError::Interrupted)
        })
        .command(CommandSpec::new("cancel"), |nb: &mut Notebook, _| {
            // Same effect as Ctrl-C arriving mid-command
            nb.context.interrupt();
            nb.counter += 100;
            Ok(Response::success("cancel finished"))
        })
        .command(
            CommandSpec::new("secret").args(1, 0),
            |_: &mut Notebook, _| Ok(Response::success("Token stored").without_history()),
        )
        .command(CommandSpec::new("depth"), |nb: &mut Notebook, _| {
            let depth = nb.context.depth();
            nb.depths.push(depth);
            Ok(Response::success(format!("Depth: {}", depth)))
        })
        .command(
            CommandSpec::new("nest").describe("Run a nested session"),
            |nb: &mut Notebook, _| {
                let script: Vec<&str> = nb.nested_script.iter().map(String::as_str).collect();
                let config = nb.nested_config.clone().unwrap_or_else(ShellConfig::minimal);
                let mut inner = Session::new(
                    Rc::new(test_registry()),
                    Notebook::new(nb.context.clone()),
                    ScriptedIo::new(&script),
                    config,
                    nb.context.clone(),
                );
                let result = inner.run();
                nb.nested_output = inner.io().output().to_string();
                nb.nested_depths = inner.instance().depths.clone();
                result.map_err(|e| CommandError::failed(e.to_string()))?;
                Ok(Response::empty())
            },
        )
}

/// Default handler recording unmatched lines.
pub fn record_unmatched(line: &str, nb: &mut Notebook) -> Result<Response, CommandError> {
    nb.unmatched.push(line.to_string());
    Ok(Response::success(format!("Heard: {}", line)))
}
