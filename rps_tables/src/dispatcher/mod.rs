//! Dispatcher: the single loop that owns every session and table.
//!
//! Each iteration handles at most one inbound command; when none is waiting
//! it waits for the first table outbox to post. Tables are polled
//! round-robin, so a busy table cannot starve the others, and a table that
//! has nothing ready never blocks the loop.

pub mod commands;
pub mod config;
pub mod errors;
pub mod event_loop;
pub mod replies;

pub use commands::{Command, UnknownCommand};
pub use config::{DeliveryPolicy, DispatcherConfig};
pub use errors::DispatchError;
pub use event_loop::{Dispatcher, OpponentFactory, Step};
