//! Transport error types.

use crate::session::SessionId;
use thiserror::Error;

/// Errors raised by inbound sources and outbound sinks
#[derive(Debug, Error)]
pub enum TransportError {
    /// A reply could not be handed to its recipient
    #[error("Failed to deliver message to {recipient}: {reason}")]
    Delivery { recipient: SessionId, reason: String },

    /// The HTTP request itself failed
    #[error("HTTP error: {0}")]
    Http(String),

    /// The remote API answered with an error
    #[error("API error: {0}")]
    Api(String),

    /// The other end of the transport is gone
    #[error("Transport closed")]
    Closed,
}

/// Result type for transport operations
pub type TransportResult<T> = Result<T, TransportError>;
