//! Session records.

use crate::game::RoundReport;
use crate::table::TableId;

/// Session identifier (the sender/chat id of the remote correspondent)
pub type SessionId = i64;

/// Win/lose tally
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Score {
    pub wins: u32,
    pub defeats: u32,
}

impl Score {
    fn apply(&mut self, report: &RoundReport) {
        self.wins += report.win_increment();
        self.defeats += report.lose_increment();
    }
}

/// Seating and score of one correspondent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Session ID
    id: SessionId,

    /// Table the session currently sits at
    table_id: Option<TableId>,

    /// Score since the most recent join
    streak: Score,

    /// Score over the whole process lifetime
    lifetime: Score,
}

impl Session {
    pub fn new(id: SessionId) -> Self {
        Self {
            id,
            table_id: None,
            streak: Score::default(),
            lifetime: Score::default(),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn table_id(&self) -> Option<TableId> {
        self.table_id
    }

    pub fn is_seated(&self) -> bool {
        self.table_id.is_some()
    }

    pub fn streak(&self) -> Score {
        self.streak
    }

    pub fn lifetime(&self) -> Score {
        self.lifetime
    }

    /// Seat the session at `table_id`.
    ///
    /// Panics if the session already sits somewhere; a session owns at
    /// most one table.
    pub fn seat(&mut self, table_id: TableId) {
        assert!(
            self.table_id.is_none(),
            "session {} is already seated at table {:?}",
            self.id,
            self.table_id
        );
        self.table_id = Some(table_id);
    }

    /// Unseat the session and reset its streak.
    ///
    /// Returns the table the session was sitting at so callers can tear it
    /// down after the reset.
    pub fn leave(&mut self) -> Option<TableId> {
        self.streak = Score::default();
        self.table_id.take()
    }

    /// Credit a resolved round to both streak and lifetime counters.
    pub fn record(&mut self, report: &RoundReport) {
        self.streak.apply(report);
        self.lifetime.apply(report);
    }

    /// Credit a round that finished after the session already left its
    /// table. Only lifetime totals move.
    pub fn record_settled(&mut self, report: &RoundReport) {
        self.lifetime.apply(report);
    }
}
