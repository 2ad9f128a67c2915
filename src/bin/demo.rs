//! shellkit-demo CLI binary
//!
//! Runs an interactive session over a small sample registry. State lives in
//! one `DemoState` for the whole session: `count` twice prints `Count: 1` then
//! `Count: 2`. Lines that are not commands are echoed back by the default
//! handler.
//!
//! ```text
//! shellkit-demo interactive --prompt "demo> " --history-file /tmp/demo_history
//! ```

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;
use std::time::{Duration, Instant};

use clap::{Args, Parser, Subcommand};

use shellkit::{
    Choice, CliError, CommandError, CommandSpec, CommandTable, EditorIo, FlagSpec, FlagValue,
    LineIo, ParsedInvocation, Response, Session, SessionContext, ShellConfig, StdIo,
};

/// Stateful interactive shell demo.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand, Debug)]
enum CliCommand {
    /// Start an interactive session.
    Interactive(InteractiveArgs),
}

#[derive(Args, Debug, Clone)]
struct InteractiveArgs {
    /// Prompt text (overrides the config file).
    #[arg(long)]
    prompt: Option<String>,
    /// History file (overrides the config file).
    #[arg(long)]
    history_file: Option<PathBuf>,
    /// Neither load nor save history.
    #[arg(long, conflicts_with = "history_file")]
    no_history: bool,
    /// TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Show error sources and panic details.
    #[arg(long)]
    debug: bool,
}

/// Output format of `process`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Choice)]
enum Format {
    Text,
    Json,
}

/// State shared by every command of one session.
struct DemoState {
    counter: u32,
    items: Vec<String>,
    config: ShellConfig,
    context: SessionContext,
}

impl DemoState {
    fn new(config: ShellConfig, context: SessionContext) -> Self {
        Self {
            counter: 0,
            items: Vec::new(),
            config,
            context,
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let result = match cli.command {
        CliCommand::Interactive(args) => run_interactive(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_interactive(args: InteractiveArgs) -> Result<(), CliError> {
    let mut config = match &args.config {
        Some(path) => ShellConfig::load(path)?,
        None => ShellConfig::default(),
    };
    if let Some(prompt) = args.prompt {
        config = config.with_prompt(prompt);
    }
    if let Some(path) = args.history_file {
        config = config.with_history_file(path);
    }
    if args.no_history {
        config = config.without_history_file();
    }
    if args.debug {
        config = config.with_debug(true);
    }
    if config.welcome.is_none() {
        config = config.with_welcome(format!(
            "shellkit demo {}. Type 'help' for commands, 'exit' to leave.",
            shellkit::VERSION
        ));
    }

    start_session(config, SessionContext::from_env())
}

/// Run one session on the terminal (or plain stdin when input is piped).
fn start_session(config: ShellConfig, context: SessionContext) -> Result<(), CliError> {
    if std::io::stdin().is_terminal() {
        run_with(EditorIo::new()?, config, context)
    } else {
        run_with(StdIo::new(), config, context)
    }
}

fn run_with<IO: LineIo>(io: IO, config: ShellConfig, context: SessionContext) -> Result<(), CliError> {
    let state = DemoState::new(config.clone(), context.clone());
    let mut session = Session::new(Rc::new(registry()), state, io, config, context)
        .with_default_handler(
            |line: &str, _: &mut DemoState| -> Result<Response, CommandError> {
                Ok(Response::success(format!("You said: {}", line)))
            },
        );
    session.run()?;
    Ok(())
}

fn registry() -> CommandTable<DemoState> {
    CommandTable::new()
        .command(
            CommandSpec::new("count").describe("Increment and show the session counter"),
            |state: &mut DemoState, _| {
                state.counter += 1;
                Ok(Response::success(format!("Count: {}", state.counter)))
            },
        )
        .command(
            CommandSpec::new("add")
                .describe("Add an item (rest of the line, unquoted)")
                .free_text()
                .arg_names(&["item"]),
            |state: &mut DemoState, call| {
                state.items.push(call.text().to_string());
                Ok(Response::success(format!("Added: {}", call.text())))
            },
        )
        .command(
            CommandSpec::new("list").describe("List added items"),
            |state: &mut DemoState, _| {
                if state.items.is_empty() {
                    return Ok(Response::success("No items."));
                }
                let lines: Vec<String> = state
                    .items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| format!("{}. {}", i + 1, item))
                    .collect();
                Ok(Response::success(lines.join("\n")).indented())
            },
        )
        .command(
            CommandSpec::new("echo")
                .describe("Print the arguments (shell quoting applies)")
                .variadic(),
            |_: &mut DemoState, call| Ok(Response::success(call.positionals.join(" "))),
        )
        .command(
            CommandSpec::new("process")
                .describe("Pretend to process a file")
                .args(1, 0)
                .arg_names(&["file"])
                .flag(FlagSpec::number("limit").short('l').describe("Maximum rows"))
                .flag(
                    FlagSpec::choice::<Format>("format")
                        .default_value(FlagValue::Str("text".into()))
                        .describe("Output format"),
                )
                .flag(FlagSpec::array("tags").short('t').describe("Tags to attach"))
                .flag(FlagSpec::map("meta").describe("key:value metadata"))
                .flag(FlagSpec::string("output").short('o').describe("Output file"))
                .flag(FlagSpec::boolean("verbose").short('v')),
            process,
        )
        .command(
            CommandSpec::new("exit-code")
                .describe("Ask the process to exit with a code (intercepted)")
                .args(1, 0)
                .arg_names(&["code"]),
            |_: &mut DemoState, call| {
                let code = call
                    .arg(0)
                    .unwrap_or("0")
                    .parse::<i32>()
                    .map_err(|e| CommandError::failed(format!("invalid code: {}", e)))?;
                Err(CommandError::Exit(code))
            },
        )
        .command(
            CommandSpec::new("wait")
                .describe("Sleep for a number of seconds (Ctrl-C cancels)")
                .args(1, 0)
                .arg_names(&["seconds"]),
            wait,
        )
        .command(
            CommandSpec::new("depth").describe("Show the session nesting depth"),
            |state: &mut DemoState, _| {
                Ok(Response::success(format!("Depth: {}", state.context.depth())))
            },
        )
        .command(
            CommandSpec::new("shell").describe("Start a nested session"),
            |state: &mut DemoState, _| {
                start_session(state.config.clone(), state.context.clone())
                    .map_err(|e| CommandError::failed(e.to_string()))?;
                Ok(Response::empty())
            },
        )
}

fn wait(state: &mut DemoState, call: &ParsedInvocation) -> Result<Response, CommandError> {
    let seconds = call
        .arg(0)
        .unwrap_or("0")
        .parse::<f64>()
        .ok()
        .and_then(|s| Duration::try_from_secs_f64(s).ok())
        .and_then(|d| Some((d, Instant::now().checked_add(d)?)));
    let Some((seconds, deadline)) = seconds else {
        return Err(CommandError::failed("seconds must be a non-negative number"));
    };

    while Instant::now() < deadline {
        if state.context.interrupted() {
            return Err(CommandError::Interrupted);
        }
        std::thread::sleep(Duration::from_millis(50));
    }
    Ok(Response::success(format!("Waited {:?}.", seconds)))
}

fn process(state: &mut DemoState, call: &ParsedInvocation) -> Result<Response, CommandError> {
    let file = call.arg(0).unwrap_or_default();
    let format = call.flags.choice::<Format>("format").unwrap_or(Format::Text);
    let limit = call.flags.number("limit");
    let tags = call.flags.list("tags");

    let mut lines = vec![format!("Processing {} as {}", file, format.as_choice())];
    if let Some(limit) = limit {
        lines.push(format!("limit: {}", limit));
    }
    if !tags.is_empty() {
        lines.push(format!("tags: {}", tags.join(", ")));
    }
    if let Some(meta) = call.flags.map("meta") {
        for (key, value) in meta {
            lines.push(format!("meta {} = {}", key, value));
        }
    }
    if let Some(output) = call.flags.str("output") {
        lines.push(format!("output: {}", output));
    }
    if call.flags.flag("verbose") {
        lines.push(format!("(session counter is {})", state.counter));
    }
    Ok(Response::success(lines.join("\n")))
}
