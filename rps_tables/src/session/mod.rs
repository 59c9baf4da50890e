//! Sessions: one per remote correspondent, tracking seating and score.

pub mod models;
pub mod registry;

pub use models::{Score, Session, SessionId};
pub use registry::SessionRegistry;
