//! Table error types.

use super::TableId;
use thiserror::Error;

/// Errors returned when forwarding a command to a table
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    /// Inbox is at capacity; the table is still working through earlier moves
    #[error("Table {0} inbox is full")]
    InboxFull(TableId),

    /// The table's task is gone
    #[error("Table {0} is closed")]
    Closed(TableId),
}

/// Result type for table operations
pub type TableResult<T> = Result<T, TableError>;
