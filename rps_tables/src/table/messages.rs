//! Table actor message types.

use crate::game::Choice;
use crate::session::SessionId;

/// Commands a table actor accepts on its inbox.
///
/// `/join` is never forwarded to a table, so it has no variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableCommand {
    /// Resolve one round for the seated session
    Play { session: SessionId, choice: Choice },

    /// Stop the table
    Exit,
}

/// Lifecycle of a table actor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableState {
    Active,
    Stopped,
}
