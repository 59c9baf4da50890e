//! # RPS Tables
//!
//! Many concurrent rock-paper-scissors tables behind a single dispatcher.
//!
//! Every correspondent gets a session. `/join` opens a table for that
//! session: a Tokio task with its own inbox and outbox that plays rounds
//! against a randomized house. The [`Dispatcher`] routes `/rock`,
//! `/scissors` and `/paper` to the right table, drains every table outbox
//! without blocking on any of them, and keeps streak and lifetime scores.
//!
//! ## Core Modules
//!
//! - [`game`]: Hands, outcomes and the house opponent
//! - [`session`]: Session records and registry
//! - [`table`]: Table actors, handles and registry
//! - [`dispatcher`]: The routing loop
//! - [`transport`]: Inbound/outbound seams to the outside world
//!
//! ## Example
//!
//! ```
//! use rps_tables::{ChannelSink, Dispatcher, DispatcherConfig, InboundMessage, inbound_channel};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let (tx, rx) = inbound_channel(16);
//!     let (sink, mut replies) = ChannelSink::new();
//!     let dispatcher = Dispatcher::new(DispatcherConfig::default(), rx, Arc::new(sink));
//!     let running = tokio::spawn(dispatcher.run());
//!
//!     tx.send(InboundMessage::new(7, "/join")).await.unwrap();
//!     let reply = replies.recv().await.unwrap();
//!     assert_eq!(reply.text, "You are now seated at table 1");
//!
//!     drop(tx);
//!     running.await.unwrap().unwrap();
//! }
//! ```

pub mod dispatcher;
pub mod game;
pub mod session;
pub mod table;
pub mod transport;

pub use dispatcher::{DeliveryPolicy, DispatchError, Dispatcher, DispatcherConfig, Step};
pub use game::{Choice, Outcome, RoundReport};
pub use session::{Score, Session, SessionId};
pub use table::{TableConfig, TableId};
pub use transport::{
    ChannelSink, InboundMessage, OutboundMessage, OutboundSink, TransportError, inbound_channel,
};
