//! Default handler for lines that match no command.
//!
//! A session without one rejects unmatched input. With one, the whole line is
//! passed through untouched so natural-language input is not split up.

use crate::error::CommandError;
use crate::response::Response;

/// Receives input lines that are not commands.
pub trait DefaultHandler<I> {
    /// Handle `line` with access to the session's persistent instance.
    fn handle(&self, line: &str, instance: &mut I) -> Result<Response, CommandError>;
}

impl<I, F> DefaultHandler<I> for F
where
    F: Fn(&str, &mut I) -> Result<Response, CommandError>,
{
    fn handle(&self, line: &str, instance: &mut I) -> Result<Response, CommandError> {
        self(line, instance)
    }
}
