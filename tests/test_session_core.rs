//! Core session behavior tests.
//!
//! Tests state persistence, calling conventions, routing through the session,
//! failure classification, help, exits and history recording.

#[allow(clippy::duplicate_mod)]
#[path = "helpers.rs"]
mod helpers;

use helpers::fixtures::Format;
use shellkit::shell::SessionEnd;
use shellkit::{SessionContext, ShellConfig};

// ============================================================================
// State and Calling Conventions
// ============================================================================

#[test]
fn test_state_persists_across_commands() {
    let (output, notebook) = helpers::run_lines(&["count", "count"]);

    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines[0], "Count: 1");
    assert_eq!(lines[1], "Count: 2");
    assert_eq!(notebook.counter, 2);
}

#[test]
fn test_free_text_command_gets_one_argument() {
    let (output, notebook) = helpers::run_lines(&["add Buy milk", "/add  spaced   words "]);

    assert_eq!(notebook.items, vec!["Buy milk", "spaced   words"]);
    helpers::assert_contains_all(&output, &["Added: Buy milk"]);
}

#[test]
fn test_flag_error_aborts_invocation() {
    let (output, notebook) = helpers::run_lines(&["process file.txt --limit abc"]);

    helpers::assert_contains_all(&output, &["Error:", "--limit", "abc"]);
    assert!(notebook.processed.is_empty());
}

#[test]
fn test_parsed_flags_reach_command() {
    let (_, notebook) =
        helpers::run_lines(&["process data.csv --limit 5 --format json-lines -t a b -v"]);

    let call = &notebook.processed[0];
    assert_eq!(call.positionals, vec!["data.csv"]);
    assert_eq!(call.flags.number("limit"), Some(5.0));
    assert_eq!(call.flags.choice::<Format>("format"), Some(Format::JsonLines));
    assert_eq!(call.flags.list("tags"), ["a", "b"]);
    assert!(call.flags.flag("verbose"));
}

#[test]
fn test_flag_default_applied() {
    let (_, notebook) = helpers::run_lines(&["process data.csv"]);

    assert_eq!(
        notebook.processed[0].flags.choice::<Format>("format"),
        Some(Format::Text)
    );
}

#[test]
fn test_quoted_arguments_and_fallback() {
    let (output, _) = helpers::run_lines(&[r#"echo "a b" c"#, r#"echo "unterminated x"#]);

    helpers::assert_contains_all(&output, &["a b|c", "\"unterminated|x"]);
}

#[test]
fn test_arity_reported_with_usage() {
    let (output, notebook) = helpers::run_lines(&["process", "add"]);

    helpers::assert_contains_all(
        &output,
        &[
            "Error: Expected 1 arguments, got 0. Usage: process <file> [flags]",
            "Usage: add <text...>",
        ],
    );
    assert!(notebook.processed.is_empty());
    assert!(notebook.items.is_empty());
}

// ============================================================================
// Routing Through the Session
// ============================================================================

#[test]
fn test_default_handler_receives_full_line() {
    let (output, notebook) = helpers::run_lines(&["unparsed input"]);

    assert_eq!(notebook.unmatched, vec!["unparsed input"]);
    helpers::assert_contains_all(&output, &["Heard: unparsed input"]);
}

#[test]
fn test_marker_and_bare_commands() {
    let (_, notebook) = helpers::run_lines(&["/count", "count", "  /count  "]);

    assert_eq!(notebook.counter, 3);
    assert!(notebook.unmatched.is_empty());
}

#[test]
fn test_blank_lines_ignored() {
    let (output, notebook) = helpers::run_lines(&["", "   ", "count"]);

    assert!(notebook.unmatched.is_empty());
    assert!(output.starts_with("Count: 1"));
}

#[test]
fn test_strict_session_rejects_unmatched() {
    let mut session = helpers::create_strict_session(&["what is this"]);
    session.run().unwrap();

    helpers::assert_contains_all(
        session.io().output(),
        &["Error: Unrecognized input", "/<command>"],
    );
}

// ============================================================================
// Failures Never End the Session
// ============================================================================

#[test]
fn test_errors_do_not_end_session() {
    let mut session = helpers::create_session(&["fail", "boom", "/nope", "count"]);
    let end = session.run().unwrap();

    assert_eq!(end, SessionEnd::Eof);
    helpers::assert_contains_all(
        session.io().output(),
        &[
            "Error: something broke",
            "Error: boom failed unexpectedly.",
            "Error: Unknown command 'nope'. Type 'help' to list commands.",
            "Count: 1",
        ],
    );
}

#[test]
fn test_debug_mode_shows_panic_detail() {
    let mut session = helpers::create_session_with(
        &["boom"],
        ShellConfig::minimal().with_debug(true),
        SessionContext::new(),
    );
    session.run().unwrap();

    helpers::assert_contains_all(session.io().output(), &["boom panicked: command exploded"]);
}

#[test]
fn test_exit_requests_intercepted() {
    let (output, notebook) = helpers::run_lines(&["exit-code 0", "exit-code 2", "count"]);

    helpers::assert_contains_all(
        &output,
        &[
            "would have succeeded",
            "Error: command requested exit with code 2",
            "Count: 1",
        ],
    );
    assert_eq!(notebook.counter, 1);
}

#[test]
fn test_interrupted_command_reported() {
    let (output, _) = helpers::run_lines(&["stop", "count"]);

    helpers::assert_contains_all(&output, &["Interrupted.", "Count: 1"]);
}

// ============================================================================
// Exits and Help
// ============================================================================

#[test]
fn test_exit_keywords() {
    for keyword in ["exit", "QUIT", "q", "/exit", "  Quit  "] {
        let mut session = helpers::create_session(&["count", keyword, "count"]);
        let end = session.run().unwrap();

        assert_eq!(end, SessionEnd::ExitCommand, "keyword {:?}", keyword);
        assert_eq!(session.instance().counter, 1);
        assert!(session.io().output().ends_with("Goodbye!\n"));
    }
}

#[test]
fn test_eof_ends_session() {
    let mut session = helpers::create_session(&[]);
    let end = session.run().unwrap();

    assert_eq!(end, SessionEnd::Eof);
    assert_eq!(session.io().output(), "\nGoodbye!\n");
}

#[test]
fn test_help_output() {
    let (output, notebook) = helpers::run_lines(&["help", "help process", "/help nope", "?"]);

    helpers::assert_contains_all(
        &output,
        &[
            "Available commands:",
            "count",
            "Increment the counter",
            "Usage: process <file> [flags]",
            "-l, --limit <number>",
            "[text, json, json-lines]",
            "Unknown command 'nope'",
        ],
    );
    assert!(notebook.unmatched.is_empty());
}

#[test]
fn test_welcome_and_prompt() {
    let mut session = helpers::create_session_with(
        &["count"],
        ShellConfig::minimal().with_welcome("Hi there").with_prompt("nb> "),
        SessionContext::new(),
    );
    session.run().unwrap();

    assert!(session.io().output().starts_with("Hi there\n"));
    assert!(session.io().prompts().iter().all(|p| p == "nb> "));
}

// ============================================================================
// History Recording
// ============================================================================

#[test]
fn test_history_records_lines_in_order() {
    let mut session = helpers::create_session(&["count", "count", "secret abc", "", "help", "exit"]);
    session.run().unwrap();

    assert_eq!(session.history().lines(), ["count", "count", "help"]);
    assert_eq!(session.io().recalled(), ["count", "count", "help"]);
}
