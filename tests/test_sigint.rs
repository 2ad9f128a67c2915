//! Ctrl-C while a command runs.
//!
//! Signals are process-wide, so this binary holds a single test: no other
//! session may be running when SIGINT is raised.

#![cfg(unix)]

#[allow(clippy::duplicate_mod)]
#[path = "fixtures/mod.rs"]
mod fixtures;

use fixtures::ScriptedIo;
use shellkit::shell::SessionEnd;
use shellkit::{
    CommandError, CommandSpec, CommandTable, Response, Session, SessionContext, ShellConfig,
};
use signal_hook::consts::SIGINT;
use signal_hook::low_level::raise;
use std::rc::Rc;
use std::time::Duration;

/// Instance for the signal tests.
#[derive(Debug)]
struct Worker {
    context: SessionContext,
    polls: u32,
    counter: u32,
}

fn registry() -> CommandTable<Worker> {
    CommandTable::new()
        .command(CommandSpec::new("slow"), |w: &mut Worker, _| {
            raise(SIGINT).map_err(|e| CommandError::failed(e.to_string()))?;
            for _ in 0..1000 {
                if w.context.interrupted() {
                    return Err(CommandError::Interrupted);
                }
                w.polls += 1;
                std::thread::sleep(Duration::from_millis(1));
            }
            Ok(Response::success("finished"))
        })
        .command(CommandSpec::new("oblivious"), |_: &mut Worker, _| {
            raise(SIGINT).map_err(|e| CommandError::failed(e.to_string()))?;
            Ok(Response::success("done anyway"))
        })
        .command(CommandSpec::new("count"), |w: &mut Worker, _| {
            w.counter += 1;
            Ok(Response::success(format!("Count: {}", w.counter)))
        })
}

#[test]
fn test_sigint_during_command_returns_to_loop() {
    let context = SessionContext::new();
    let worker = Worker {
        context: context.clone(),
        polls: 0,
        counter: 0,
    };
    let mut session = Session::new(
        Rc::new(registry()),
        worker,
        ScriptedIo::new(&["slow", "oblivious", "count"]),
        ShellConfig::minimal(),
        context.clone(),
    );

    let end = session.run().unwrap();

    assert_eq!(end, SessionEnd::Eof);
    let output = session.io().output();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines[0], "Interrupted.");
    assert_eq!(lines[1], "Interrupted.");
    assert_eq!(lines[2], "Count: 1");
    assert!(output.ends_with("Goodbye!\n"));
    assert!(!output.contains("finished"));
    assert!(!output.contains("done anyway"));

    assert_eq!(session.instance().polls, 0);
    assert!(!context.interrupted());
}
