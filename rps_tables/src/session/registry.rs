//! Session registry owned by the dispatcher.

use super::models::{Session, SessionId};
use std::collections::HashMap;

/// Session ID to session state mapping.
///
/// Not synchronised: only the dispatcher task holds one.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: HashMap<SessionId, Session>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: SessionId) -> Option<&Session> {
        self.sessions.get(&id)
    }

    /// Fetch the session for `id`, creating an unseated one on first contact.
    pub fn get_or_create(&mut self, id: SessionId) -> &mut Session {
        self.sessions.entry(id).or_insert_with(|| {
            log::info!("New session {}", id);
            Session::new(id)
        })
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
