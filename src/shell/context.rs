//! Session nesting context.
//!
//! A `SessionContext` is created once by the host and handed to every session
//! it starts. Sessions started from inside a command share the same counter, so
//! the current nesting depth is always known without process-global state.
//! Child processes learn the depth through [`SESSION_DEPTH_ENV`].
//!
//! The context also carries the interrupt flag. While a session runs, SIGINT
//! sets it instead of terminating the process; long-running commands poll
//! [`SessionContext::interrupted`] and return `CommandError::Interrupted`.

use crate::error::CliError;
use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Environment variable carrying the nesting depth to child processes.
pub const SESSION_DEPTH_ENV: &str = "SHELLKIT_SESSION_DEPTH";

/// Shared nesting-depth counter and interrupt flag.
///
/// Cloning is cheap and clones observe the same depth and flag.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    depth: Rc<Cell<usize>>,
    interrupted: Arc<AtomicBool>,
}

impl SessionContext {
    /// Context with no active session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Context starting at the depth inherited from the environment.
    ///
    /// An unset or unparsable variable means depth 0.
    pub fn from_env() -> Self {
        let depth = std::env::var(SESSION_DEPTH_ENV)
            .ok()
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(0);
        Self::with_depth(depth)
    }

    /// Context starting at `depth`.
    pub fn with_depth(depth: usize) -> Self {
        Self {
            depth: Rc::new(Cell::new(depth)),
            interrupted: Arc::default(),
        }
    }

    /// Number of sessions currently running (0 outside any session).
    pub fn depth(&self) -> usize {
        self.depth.get()
    }

    /// True while at least one session is running.
    pub fn in_session(&self) -> bool {
        self.depth() > 0
    }

    /// Mark a session as started; the returned guard ends it when dropped.
    ///
    /// The guard restores the depth seen at entry, so the count is correct
    /// even when a session unwinds.
    pub fn enter(&self) -> DepthGuard {
        let previous = self.depth.get();
        self.depth.set(previous + 1);
        DepthGuard {
            depth: Rc::clone(&self.depth),
            previous,
        }
    }

    /// True once Ctrl-C was pressed during the current command.
    pub fn interrupted(&self) -> bool {
        self.interrupted.load(Ordering::Relaxed)
    }

    /// Raise the interrupt flag by hand, as SIGINT does.
    pub fn interrupt(&self) {
        self.interrupted.store(true, Ordering::Relaxed);
    }

    /// Clear the flag, returning whether it was set.
    pub fn take_interrupt(&self) -> bool {
        self.interrupted.swap(false, Ordering::Relaxed)
    }

    /// Route SIGINT to the interrupt flag until the returned guard drops.
    ///
    /// Each session holds one while it runs, so Ctrl-C during a command
    /// reaches the loop instead of killing the process.
    pub fn watch_interrupts(&self) -> Result<InterruptWatch, CliError> {
        #[cfg(unix)]
        {
            let id = signal_hook::flag::register(
                signal_hook::consts::SIGINT,
                Arc::clone(&self.interrupted),
            )?;
            Ok(InterruptWatch { id })
        }
        #[cfg(not(unix))]
        {
            Ok(InterruptWatch {})
        }
    }

    /// `(name, value)` to export to a child process started from the
    /// current depth.
    pub fn env_var(&self) -> (&'static str, String) {
        (SESSION_DEPTH_ENV, self.depth().to_string())
    }
}

/// Active-session marker returned by [`SessionContext::enter`].
#[derive(Debug)]
#[must_use = "the session ends when the guard is dropped"]
pub struct DepthGuard {
    depth: Rc<Cell<usize>>,
    previous: usize,
}

impl DepthGuard {
    /// Depth of the session this guard belongs to (1 for the outermost).
    pub fn level(&self) -> usize {
        self.previous + 1
    }
}

impl Drop for DepthGuard {
    fn drop(&mut self) {
        self.depth.set(self.previous);
    }
}

/// SIGINT registration returned by [`SessionContext::watch_interrupts`].
///
/// Dropping it removes the registration. The process default (terminate) is
/// not reinstated afterwards; SIGINT stays caught by the now-empty handler.
#[derive(Debug)]
#[must_use = "SIGINT is only watched while the guard lives"]
pub struct InterruptWatch {
    #[cfg(unix)]
    id: signal_hook::SigId,
}

impl Drop for InterruptWatch {
    fn drop(&mut self) {
        #[cfg(unix)]
        signal_hook::low_level::unregister(self.id);
    }
}
