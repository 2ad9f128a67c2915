//! Double-interrupt exit policy.
//!
//! A single Ctrl-C at the prompt discards the line. A second one within the
//! timeout ends the session. Any completed input line resets the window.

use crate::config::InterruptBehavior;
use std::time::{Duration, Instant};

/// What the session does for one interrupt.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum InterruptAction {
    /// Discard the line and tell the user how to exit
    ClearLine,

    /// Discard the line and print the help reminder
    ShowHelp,

    /// Discard the line quietly
    Ignore,

    /// Second interrupt inside the window: end the session
    Exit,
}

/// Tracks the time of the last interrupt.
#[derive(Debug, Clone)]
pub struct InterruptPolicy {
    behavior: InterruptBehavior,
    timeout: Duration,
    last: Option<Instant>,
}

impl InterruptPolicy {
    /// Policy with the given single-interrupt behavior and double-press window.
    pub fn new(behavior: InterruptBehavior, timeout: Duration) -> Self {
        Self {
            behavior,
            timeout,
            last: None,
        }
    }

    /// Handle an interrupt received at `now`.
    pub fn on_interrupt(&mut self, now: Instant) -> InterruptAction {
        if let Some(last) = self.last
            && now.saturating_duration_since(last) <= self.timeout
        {
            self.last = None;
            return InterruptAction::Exit;
        }

        self.last = Some(now);
        match self.behavior {
            InterruptBehavior::ClearLine => InterruptAction::ClearLine,
            InterruptBehavior::ShowHelp => InterruptAction::ShowHelp,
            InterruptBehavior::Silent => InterruptAction::Ignore,
        }
    }

    /// Forget the last interrupt (called for every completed input line).
    pub fn reset(&mut self) {
        self.last = None;
    }

    /// Double-press window.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}
