//! Table actor implementation with async message handling.

use super::{
    TableId,
    config::TableConfig,
    errors::{TableError, TableResult},
    messages::{TableCommand, TableState},
};
use crate::{
    game::{Opponent, RoundReport, resolve},
    session::SessionId,
};
use std::task::{Context, Poll};
use tokio::sync::mpsc::{self, error::TrySendError};

/// Dispatcher-side endpoints of a running table
pub struct TableHandle {
    /// Table ID
    id: TableId,

    /// Session that owns the table
    owner: SessionId,

    /// Command inbox of the actor
    inbox: mpsc::Sender<TableCommand>,

    /// Result outbox of the actor
    outbox: mpsc::Receiver<RoundReport>,
}

impl TableHandle {
    /// Get table ID
    pub fn id(&self) -> TableId {
        self.id
    }

    /// Get owning session ID
    pub fn owner(&self) -> SessionId {
        self.owner
    }

    /// Queue a command on the table without waiting.
    pub fn forward(&self, command: TableCommand) -> TableResult<()> {
        self.inbox.try_send(command).map_err(|e| match e {
            TrySendError::Full(_) => TableError::InboxFull(self.id),
            TrySendError::Closed(_) => TableError::Closed(self.id),
        })
    }

    /// Poll the outbox, registering the waker when nothing is posted yet.
    ///
    /// `Ready(None)` means the actor is gone.
    pub fn poll_report(&mut self, cx: &mut Context<'_>) -> Poll<Option<RoundReport>> {
        self.outbox.poll_recv(cx)
    }

    /// Stop the table and collect every round it still resolves.
    ///
    /// Moves queued ahead of the exit are played out first, so the
    /// returned reports cover everything the owner submitted.
    pub async fn stop(self) -> Vec<RoundReport> {
        let Self {
            id,
            inbox,
            mut outbox,
            ..
        } = self;

        // A full inbox still stops the actor once the queue drains, since
        // the inbox closes when `inbox` is dropped below.
        if let Err(TrySendError::Full(_)) = inbox.try_send(TableCommand::Exit) {
            log::debug!("Table {} inbox full on exit, closing it instead", id);
        }
        drop(inbox);

        let mut settled = Vec::new();
        while let Some(report) = outbox.recv().await {
            settled.push(report);
        }
        settled
    }
}

/// Actor running a single table
pub struct TableActor {
    /// Table ID
    id: TableId,

    /// Owning session, fixed at creation
    owner: SessionId,

    /// Command inbox
    inbox: mpsc::Receiver<TableCommand>,

    /// Result outbox, holds one unread report
    outbox: mpsc::Sender<RoundReport>,

    /// House hand source
    opponent: Box<dyn Opponent>,
}

impl TableActor {
    /// Create a new table actor
    ///
    /// # Arguments
    ///
    /// * `id` - Table ID
    /// * `owner` - Session the table is opened for
    /// * `config` - Table configuration
    /// * `opponent` - House hand source
    ///
    /// # Returns
    ///
    /// * `(TableActor, TableHandle)` - Actor and handle for the dispatcher
    pub fn new(
        id: TableId,
        owner: SessionId,
        config: &TableConfig,
        opponent: Box<dyn Opponent>,
    ) -> (Self, TableHandle) {
        let (inbox_tx, inbox) = mpsc::channel(config.inbox_capacity);
        let (outbox, outbox_rx) = mpsc::channel(1);

        let actor = Self {
            id,
            owner,
            inbox,
            outbox,
            opponent,
        };

        let handle = TableHandle {
            id,
            owner,
            inbox: inbox_tx,
            outbox: outbox_rx,
        };

        (actor, handle)
    }

    /// Run the table actor event loop
    pub async fn run(mut self) {
        log::info!("Table {} opened for session {}", self.id, self.owner);

        while let Some(command) = self.inbox.recv().await {
            if self.handle_command(command).await == TableState::Stopped {
                break;
            }
        }

        log::info!("Table {} closed", self.id);
    }

    /// Handle a single command
    async fn handle_command(&mut self, command: TableCommand) -> TableState {
        match command {
            TableCommand::Exit => TableState::Stopped,

            TableCommand::Play { session, choice } => {
                assert_eq!(
                    session, self.owner,
                    "table {} received a move from session {}",
                    self.id, session
                );

                // Claim the outbox slot first so at most one unread result exists
                let Ok(permit) = self.outbox.reserve().await else {
                    log::debug!("Table {}: outbox dropped, stopping", self.id);
                    return TableState::Stopped;
                };

                let report = resolve(choice, self.opponent.as_mut());
                log::debug!(
                    "Table {}: {} vs {} -> {}",
                    self.id,
                    report.player,
                    report.opponent,
                    report.outcome
                );
                permit.send(report);

                TableState::Active
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Choice, FixedOpponent, Outcome};
    use std::future::poll_fn;
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };
    use std::time::Duration;
    use tokio::time::timeout;

    fn spawn_table(inbox_capacity: usize, house: Choice) -> TableHandle {
        let config = TableConfig { inbox_capacity };
        let (actor, handle) = TableActor::new(1, 10, &config, Box::new(FixedOpponent(house)));
        tokio::spawn(actor.run());
        handle
    }

    async fn next_report(handle: &mut TableHandle) -> Option<RoundReport> {
        timeout(
            Duration::from_secs(1),
            poll_fn(|cx| handle.poll_report(cx)),
        )
        .await
        .expect("table did not post a report")
    }

    #[tokio::test]
    async fn test_play_posts_report() {
        let mut handle = spawn_table(4, Choice::Scissors);
        handle
            .forward(TableCommand::Play {
                session: 10,
                choice: Choice::Rock,
            })
            .unwrap();

        let report = next_report(&mut handle).await.unwrap();
        assert_eq!(report.outcome, Outcome::Victory);
        assert_eq!(report.opponent, Choice::Scissors);
    }

    #[tokio::test]
    async fn test_exit_stops_without_report() {
        let mut handle = spawn_table(4, Choice::Rock);
        handle.forward(TableCommand::Exit).unwrap();

        // Outbox closes once the actor returns
        assert_eq!(next_report(&mut handle).await, None);
    }

    #[tokio::test]
    async fn test_forward_to_full_inbox_is_rejected() {
        let handle = spawn_table(1, Choice::Rock);
        let play = TableCommand::Play {
            session: 10,
            choice: Choice::Paper,
        };

        // One report parks in the outbox, one move waits in the actor, one
        // fills the inbox. Nothing drains, so a further move must bounce.
        let mut result = Ok(());
        for _ in 0..8 {
            result = handle.forward(play);
            if result.is_err() {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert_eq!(result, Err(TableError::InboxFull(1)));
    }

    #[tokio::test]
    async fn test_stop_settles_queued_moves() {
        let handle = spawn_table(4, Choice::Rock);
        for _ in 0..3 {
            handle
                .forward(TableCommand::Play {
                    session: 10,
                    choice: Choice::Paper,
                })
                .unwrap();
        }

        let settled = timeout(Duration::from_secs(1), handle.stop())
            .await
            .unwrap();
        assert_eq!(settled.len(), 3);
        assert!(settled.iter().all(|r| r.outcome == Outcome::Victory));
    }

    #[tokio::test]
    async fn test_forward_after_actor_stopped_is_closed() {
        let mut handle = spawn_table(4, Choice::Rock);
        handle.forward(TableCommand::Exit).unwrap();
        assert_eq!(next_report(&mut handle).await, None);

        let result = handle.forward(TableCommand::Play {
            session: 10,
            choice: Choice::Rock,
        });
        assert_eq!(result, Err(TableError::Closed(1)));
    }

    #[tokio::test]
    #[should_panic(expected = "received a move from session")]
    async fn test_move_from_foreign_session_panics() {
        let config = TableConfig::default();
        let (mut actor, _handle) =
            TableActor::new(1, 10, &config, Box::new(FixedOpponent(Choice::Rock)));
        actor
            .handle_command(TableCommand::Play {
                session: 11,
                choice: Choice::Rock,
            })
            .await;
    }

    struct CountingOpponent(Arc<AtomicUsize>);

    impl Opponent for CountingOpponent {
        fn draw(&mut self) -> Choice {
            self.0.fetch_add(1, Ordering::SeqCst);
            Choice::Rock
        }
    }

    #[tokio::test]
    async fn test_resolves_one_round_ahead_of_drain() {
        let draws = Arc::new(AtomicUsize::new(0));
        let (actor, mut handle) = TableActor::new(
            1,
            10,
            &TableConfig::default(),
            Box::new(CountingOpponent(draws.clone())),
        );
        tokio::spawn(actor.run());

        for _ in 0..3 {
            handle
                .forward(TableCommand::Play {
                    session: 10,
                    choice: Choice::Paper,
                })
                .unwrap();
        }

        // Nothing drained yet: only the round sitting in the outbox is drawn
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(draws.load(Ordering::SeqCst), 1);

        // Each drain frees the slot for exactly one more round
        next_report(&mut handle).await.unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(draws.load(Ordering::SeqCst), 2);
    }
}
