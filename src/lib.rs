//! # shellkit
//!
//! Interactive command shell over a declared command registry.
//!
//! **Key features:**
//! - **Persistent instance** - Every command of a session runs against the same object
//! - **Command or conversation** - Lines that are not commands go to a default handler
//! - **GNU-style flags** - Typed flag parsing with short aliases, arrays and maps
//! - **Context-aware completion** - Command names, flag names and filesystem paths
//! - **Resilient loop** - Command errors, panics and exit requests never end the session
//! - **Nested sessions** - Depth tracked through an explicit [`SessionContext`]
//!
//! ## Optional Features
//!
//! - `completion` - Tab completion (enabled by default)
//! - `history` - History load/save at session boundaries (enabled by default)
//! - `readline` - rustyline-backed [`EditorIo`] line reader (enabled by default)
//! - `demo` - Builds the `shellkit-demo` binary
//!
//! The library provides a `#[derive(Choice)]` macro for enum-restricted flag
//! values; it is always available.
//!
//! ```rust,ignore
//! use shellkit::{CommandSpec, CommandTable, FlagSpec, Response};
//!
//! #[derive(Default)]
//! struct Counter { value: u32 }
//!
//! let registry = CommandTable::new()
//!     .command(CommandSpec::new("count").describe("Increment the counter"),
//!         |c: &mut Counter, _| {
//!             c.value += 1;
//!             Ok(Response::success(format!("Count: {}", c.value)))
//!         });
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![allow(clippy::result_large_err)]

// Lets the derive macro's `::shellkit::...` paths resolve inside this crate
extern crate self as shellkit;

// Re-export derive macro (always available); shares its name with the trait
pub use shellkit_macros::Choice;

// ============================================================================
// Module Declarations
// ============================================================================

pub mod completion;
pub mod config;
pub mod error;
pub mod flags;
pub mod io;
pub mod registry;
pub mod response;
pub mod shell;

// ============================================================================
// Re-exports - Public API
// ============================================================================

// Line I/O
pub use io::{LineIo, LoopOutcome, StdIo};

#[cfg(feature = "readline")]
pub use io::EditorIo;

// Configuration
pub use config::{InterruptBehavior, ShellConfig};

// Error types
pub use error::{CliError, CommandError, FlagError, TokenizeError, UsageError};

// Flags
pub use flags::{Choice, FlagKind, FlagSpec, FlagValue, FlagValues};

// Registry
pub use registry::{CommandCatalog, CommandRegistry, CommandSpec, CommandTable, ParsedInvocation};

// Completion
pub use completion::{Completion, CompletionEngine};

// Response types
pub use response::Response;

// Session
pub use shell::{DefaultHandler, Session, SessionContext, SessionEnd};

// ============================================================================
// Library Metadata
// ============================================================================

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
