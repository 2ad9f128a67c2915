//! Shared test helpers to reduce duplication across integration tests.

#![allow(dead_code)]

#[allow(clippy::duplicate_mod)]
#[path = "fixtures/mod.rs"]
pub mod fixtures;

use fixtures::{Notebook, ScriptedIo, record_unmatched, test_registry};
use shellkit::{CommandTable, Session, SessionContext, ShellConfig};
use std::rc::Rc;

/// Session type used throughout the integration tests.
pub type TestSession = Session<Notebook, CommandTable<Notebook>, ScriptedIo>;

// ============================================================================
// Session Creation Helpers
// ============================================================================

/// Session over the test registry with a recording default handler.
pub fn create_session(lines: &[&str]) -> TestSession {
    create_session_with(lines, ShellConfig::minimal(), SessionContext::new())
}

/// Session with explicit config and context.
pub fn create_session_with(
    lines: &[&str],
    config: ShellConfig,
    context: SessionContext,
) -> TestSession {
    Session::new(
        Rc::new(test_registry()),
        Notebook::new(context.clone()),
        ScriptedIo::new(lines),
        config,
        context,
    )
    .with_default_handler(record_unmatched)
}

/// Session without a default handler (unmatched input is rejected).
pub fn create_strict_session(lines: &[&str]) -> TestSession {
    let context = SessionContext::new();
    Session::new(
        Rc::new(test_registry()),
        Notebook::new(context.clone()),
        ScriptedIo::new(lines),
        ShellConfig::minimal(),
        context,
    )
}

/// Run `lines` through a fresh session; returns the output and the instance.
pub fn run_lines(lines: &[&str]) -> (String, Notebook) {
    let mut session = create_session(lines);
    session.run().unwrap();
    let output = session.io().output().to_string();
    (output, session.into_instance())
}

// ============================================================================
// Assertion Helpers
// ============================================================================

/// Assert that output contains all expected strings.
pub fn assert_contains_all(output: &str, expected: &[&str]) {
    for s in expected {
        assert!(
            output.contains(s),
            "Expected '{}' in output, got: {}",
            s,
            output
        );
    }
}

/// Assert that output contains none of the given strings.
pub fn assert_contains_none(output: &str, unexpected: &[&str]) {
    for s in unexpected {
        assert!(
            !output.contains(s),
            "Did not expect '{}' in output, got: {}",
            s,
            output
        );
    }
}
