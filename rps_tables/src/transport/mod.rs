//! Seams between the dispatcher and the outside world.
//!
//! Inbound messages arrive on an mpsc channel filled by whatever source
//! the binary wires up. Replies leave through an [`OutboundSink`].

pub mod errors;

pub use errors::{TransportError, TransportResult};

use crate::session::SessionId;
use async_trait::async_trait;
use tokio::sync::mpsc;

/// One textual command from a remote correspondent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub sender: SessionId,
    pub text: String,
}

impl InboundMessage {
    pub fn new(sender: SessionId, text: impl Into<String>) -> Self {
        Self {
            sender,
            text: text.into(),
        }
    }
}

/// One reply addressed to a correspondent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub recipient: SessionId,
    pub text: String,
}

/// Delivers replies to correspondents
#[async_trait]
pub trait OutboundSink: Send + Sync {
    async fn deliver(&self, recipient: SessionId, text: &str) -> TransportResult<()>;
}

/// Bounded inbound channel for sources to push into.
pub fn inbound_channel(
    capacity: usize,
) -> (mpsc::Sender<InboundMessage>, mpsc::Receiver<InboundMessage>) {
    mpsc::channel(capacity)
}

/// Sink that hands replies to an in-process receiver
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: mpsc::UnboundedSender<OutboundMessage>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<OutboundMessage>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

#[async_trait]
impl OutboundSink for ChannelSink {
    async fn deliver(&self, recipient: SessionId, text: &str) -> TransportResult<()> {
        self.sender
            .send(OutboundMessage {
                recipient,
                text: text.to_string(),
            })
            .map_err(|_| TransportError::Closed)
    }
}
