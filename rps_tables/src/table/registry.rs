//! Registry of live table handles, owned by the dispatcher.

use super::{TableId, actor::TableHandle};
use crate::{game::RoundReport, session::SessionId};
use std::{
    collections::BTreeMap,
    future::poll_fn,
    task::{Context, Poll},
};

/// Something surfaced from a table outbox
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Drained {
    /// The table resolved a round for its owner
    Report {
        table_id: TableId,
        owner: SessionId,
        report: RoundReport,
    },

    /// The table's actor ended without being told to
    Closed { table_id: TableId, owner: SessionId },
}

/// Table ID to handle mapping plus the ID allocator
pub struct TableRegistry {
    /// Active table handles
    tables: BTreeMap<TableId, TableHandle>,

    /// Next table ID, never reused
    next_table_id: TableId,

    /// Last table an outbox scan surfaced from
    cursor: Option<TableId>,
}

impl Default for TableRegistry {
    fn default() -> Self {
        Self {
            tables: BTreeMap::new(),
            next_table_id: 1,
            cursor: None,
        }
    }
}

impl TableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out the next table ID.
    pub fn allocate_id(&mut self) -> TableId {
        let table_id = self.next_table_id;
        self.next_table_id += 1;
        table_id
    }

    /// Register a handle. Panics if its ID is already live.
    pub fn insert(&mut self, handle: TableHandle) {
        let table_id = handle.id();
        let previous = self.tables.insert(table_id, handle);
        assert!(previous.is_none(), "table {table_id} registered twice");
    }

    pub fn get(&self, table_id: TableId) -> Option<&TableHandle> {
        self.tables.get(&table_id)
    }

    pub fn remove(&mut self, table_id: TableId) -> Option<TableHandle> {
        self.tables.remove(&table_id)
    }

    pub fn contains(&self, table_id: TableId) -> bool {
        self.tables.contains_key(&table_id)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = TableId> + '_ {
        self.tables.keys().copied()
    }

    /// Remove every table, for shutdown.
    pub fn take_all(&mut self) -> Vec<TableHandle> {
        std::mem::take(&mut self.tables).into_values().collect()
    }

    /// Table IDs in scan order: round-robin, starting after the table
    /// that was surfaced last.
    fn scan_order(&self) -> Vec<TableId> {
        let (after, upto): (Vec<TableId>, Vec<TableId>) = self
            .tables
            .keys()
            .copied()
            .partition(|id| self.cursor.is_none_or(|cursor| *id > cursor));
        after.into_iter().chain(upto).collect()
    }

    /// Poll every outbox once, returning the first posted item.
    ///
    /// Pending outboxes register the waker, so a pending result resumes as
    /// soon as any table posts.
    pub fn poll_drain(&mut self, cx: &mut Context<'_>) -> Poll<Drained> {
        for table_id in self.scan_order() {
            let Some(handle) = self.tables.get_mut(&table_id) else {
                continue;
            };

            let drained = match handle.poll_report(cx) {
                Poll::Pending => continue,
                Poll::Ready(Some(report)) => Drained::Report {
                    table_id,
                    owner: handle.owner(),
                    report,
                },
                Poll::Ready(None) => Drained::Closed {
                    table_id,
                    owner: handle.owner(),
                },
            };

            self.cursor = Some(table_id);
            return Poll::Ready(drained);
        }

        Poll::Pending
    }

    /// Wait until any table posts. Cancel safe: nothing is consumed unless
    /// the future completes.
    pub async fn next_drained(&mut self) -> Drained {
        poll_fn(|cx| self.poll_drain(cx)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Choice, FixedOpponent};
    use crate::table::{TableActor, TableCommand, TableConfig};
    use std::time::Duration;
    use tokio::time::timeout;

    fn open_table(registry: &mut TableRegistry, owner: SessionId) -> TableId {
        let table_id = registry.allocate_id();
        let (actor, handle) = TableActor::new(
            table_id,
            owner,
            &TableConfig::default(),
            Box::new(FixedOpponent(Choice::Rock)),
        );
        tokio::spawn(actor.run());
        registry.insert(handle);
        table_id
    }

    fn play(registry: &TableRegistry, table_id: TableId, owner: SessionId) {
        registry
            .get(table_id)
            .unwrap()
            .forward(TableCommand::Play {
                session: owner,
                choice: Choice::Paper,
            })
            .unwrap();
    }

    #[test]
    fn test_ids_are_never_reused() {
        let mut registry = TableRegistry::new();
        let a = registry.allocate_id();
        let b = registry.allocate_id();
        registry.remove(b);
        let c = registry.allocate_id();
        assert_eq!((a, b, c), (1, 2, 3));
    }

    #[tokio::test]
    async fn test_drain_surfaces_report_with_owner() {
        let mut registry = TableRegistry::new();
        let table_id = open_table(&mut registry, 77);
        play(&registry, table_id, 77);

        let drained = timeout(Duration::from_secs(1), registry.next_drained())
            .await
            .unwrap();
        match drained {
            Drained::Report {
                table_id: id,
                owner,
                report,
            } => {
                assert_eq!(id, table_id);
                assert_eq!(owner, 77);
                assert_eq!(report.player, Choice::Paper);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_drain_is_round_robin() {
        let mut registry = TableRegistry::new();
        let first = open_table(&mut registry, 1);
        let second = open_table(&mut registry, 2);

        // Two reports each: one parked in the outbox, one waiting to post
        for _ in 0..2 {
            play(&registry, first, 1);
            play(&registry, second, 2);
        }

        let mut order = Vec::new();
        for _ in 0..4 {
            let drained = timeout(Duration::from_secs(1), registry.next_drained())
                .await
                .unwrap();
            if let Drained::Report { table_id, .. } = drained {
                order.push(table_id);
            }
        }

        assert_eq!(order, vec![first, second, first, second]);
    }

    #[tokio::test]
    async fn test_idle_tables_surface_nothing() {
        let mut registry = TableRegistry::new();
        open_table(&mut registry, 1);

        let waited = timeout(Duration::from_millis(50), registry.next_drained()).await;
        assert!(waited.is_err());
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn test_closed_table_is_reported() {
        let mut registry = TableRegistry::new();
        let table_id = open_table(&mut registry, 5);
        registry
            .get(table_id)
            .unwrap()
            .forward(TableCommand::Exit)
            .unwrap();

        let drained = timeout(Duration::from_secs(1), registry.next_drained())
            .await
            .unwrap();
        assert_eq!(drained, Drained::Closed { table_id, owner: 5 });
    }
}
