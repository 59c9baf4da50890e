//! Table module providing per-session tables with an async actor model.
//!
//! This module implements:
//! - TableActor: Async actor resolving rounds for a single table
//! - TableHandle: Dispatcher-side inbox sender and outbox receiver
//! - TableRegistry: Live handles keyed by table ID, with a non-blocking
//!   round-robin drain over every outbox
//!
//! ## Architecture
//!
//! Each table runs in a separate Tokio task. Commands arrive on a bounded
//! mpsc inbox; results leave on an outbox that holds a single report, so a
//! table never runs more than one result ahead of the dispatcher.
//!
//! ## Example
//!
//! ```
//! use rps_tables::game::{Choice, FixedOpponent};
//! use rps_tables::table::{TableActor, TableCommand, TableConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = TableConfig::default();
//!     let (actor, handle) =
//!         TableActor::new(1, 42, &config, Box::new(FixedOpponent(Choice::Rock)));
//!
//!     tokio::spawn(actor.run());
//!
//!     handle
//!         .forward(TableCommand::Play { session: 42, choice: Choice::Paper })
//!         .unwrap();
//!     let settled = handle.stop().await;
//!     assert_eq!(settled.len(), 1);
//! }
//! ```

pub mod actor;
pub mod config;
pub mod errors;
pub mod messages;
pub mod registry;

/// Table identifier, assigned from 1 upwards and never reused
pub type TableId = u64;

pub use actor::{TableActor, TableHandle};
pub use config::TableConfig;
pub use errors::{TableError, TableResult};
pub use messages::{TableCommand, TableState};
pub use registry::{Drained, TableRegistry};
