//! The dispatcher loop: routes commands to tables and surfaces their
//! results.

use super::{
    commands::Command,
    config::{DeliveryPolicy, DispatcherConfig},
    errors::DispatchError,
    replies,
};
use crate::{
    game::{Opponent, RandomOpponent},
    session::{Session, SessionId, SessionRegistry},
    table::{Drained, TableActor, TableCommand, TableError, TableRegistry},
    transport::{InboundMessage, OutboundMessage, OutboundSink},
};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Builds the house side for each new table
pub type OpponentFactory = Box<dyn Fn() -> Box<dyn Opponent> + Send + Sync>;

/// What a single dispatcher iteration did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// A reply was produced and delivered
    Replied(OutboundMessage),

    /// The iteration changed state without anything to say
    Silent,

    /// Every inbound sender is gone
    InboundClosed,
}

enum Event {
    Inbound(Option<InboundMessage>),
    Drained(Drained),
}

/// Single owner of the session and table registries
pub struct Dispatcher {
    /// Dispatcher configuration
    config: DispatcherConfig,

    /// Session ID to session state
    sessions: SessionRegistry,

    /// Table ID to live table handle
    tables: TableRegistry,

    /// Inbound commands, in arrival order
    inbound: mpsc::Receiver<InboundMessage>,

    /// Reply delivery
    outbound: Arc<dyn OutboundSink>,

    /// House side for new tables
    opponents: OpponentFactory,
}

impl Dispatcher {
    /// Create a dispatcher whose tables draw the house hand at random
    ///
    /// # Arguments
    ///
    /// * `config` - Dispatcher configuration
    /// * `inbound` - Receiving half of the inbound channel
    /// * `outbound` - Reply sink
    ///
    /// `config` must pass [`DispatcherConfig::validate`]; a zero inbox
    /// capacity would panic on the first `/join`. Debug builds check this here.
    pub fn new(
        config: DispatcherConfig,
        inbound: mpsc::Receiver<InboundMessage>,
        outbound: Arc<dyn OutboundSink>,
    ) -> Self {
        debug_assert!(
            config.validate().is_ok(),
            "invalid dispatcher config: {:?}",
            config.validate()
        );

        Self {
            config,
            sessions: SessionRegistry::new(),
            tables: TableRegistry::new(),
            inbound,
            outbound,
            opponents: Box::new(|| Box::new(RandomOpponent::new())),
        }
    }

    /// Replace the house side used for tables opened from now on.
    pub fn with_opponents<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Box<dyn Opponent> + Send + Sync + 'static,
    {
        self.opponents = Box::new(factory);
        self
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    pub fn session(&self, id: SessionId) -> Option<&Session> {
        self.sessions.get(id)
    }

    pub fn tables(&self) -> &TableRegistry {
        &self.tables
    }

    /// Run until the inbound channel closes, then stop every table.
    pub async fn run(self) -> Result<(), DispatchError> {
        self.run_until(std::future::pending()).await
    }

    /// Run until the inbound channel closes or `signal` completes, then stop
    /// every table. The signal is only observed between iterations.
    pub async fn run_until<F>(mut self, signal: F) -> Result<(), DispatchError>
    where
        F: Future<Output = ()>,
    {
        log::info!("Dispatcher running");
        tokio::pin!(signal);

        let result = loop {
            let event = tokio::select! {
                biased;
                _ = &mut signal => break Ok(()),
                event = self.next_event() => event,
            };

            match self.process(event).await {
                Ok(Step::InboundClosed) => break Ok(()),
                Ok(_) => {}
                Err(e) => break Err(e),
            }
        };

        self.shutdown().await;
        log::info!("Dispatcher stopped");
        result
    }

    /// One iteration: handle one inbound command if any is waiting,
    /// otherwise wait for the first table to post, then deliver the reply.
    pub async fn step(&mut self) -> Result<Step, DispatchError> {
        let event = self.next_event().await;
        self.process(event).await
    }

    /// Cancel safe: nothing is consumed unless an event is returned.
    async fn next_event(&mut self) -> Event {
        tokio::select! {
            biased;
            message = self.inbound.recv() => Event::Inbound(message),
            drained = self.tables.next_drained() => Event::Drained(drained),
        }
    }

    async fn process(&mut self, event: Event) -> Result<Step, DispatchError> {
        let reply = match event {
            Event::Inbound(None) => return Ok(Step::InboundClosed),
            Event::Inbound(Some(message)) => self.handle_inbound(message).await,
            Event::Drained(drained) => Some(self.handle_drained(drained)),
        };

        match reply {
            Some(reply) => {
                self.deliver(&reply).await?;
                Ok(Step::Replied(reply))
            }
            None => Ok(Step::Silent),
        }
    }

    /// Stop every live table, crediting and delivering rounds they still
    /// resolve. Delivery failures are only logged here.
    pub async fn shutdown(&mut self) {
        let handles = self.tables.take_all();
        if !handles.is_empty() {
            log::info!("Stopping {} table(s)", handles.len());
        }

        for handle in handles {
            let owner = handle.owner();
            let settled = handle.stop().await;

            let session = self.sessions.get_or_create(owner);
            session.leave();
            for report in &settled {
                session.record_settled(report);
                if let Err(e) = self.outbound.deliver(owner, &report.text()).await {
                    log::warn!("Dropping final result for {}: {}", owner, e);
                }
            }
        }
    }

    async fn handle_inbound(&mut self, message: InboundMessage) -> Option<OutboundMessage> {
        let InboundMessage { sender, text } = message;

        let reply = match text.parse::<Command>() {
            Ok(command) => self.handle_command(sender, command).await,
            Err(_) => Some(replies::UNKNOWN_COMMAND.to_string()),
        };

        log::info!(
            "[{}] input:{} output:{}",
            sender,
            text,
            reply.as_deref().unwrap_or("")
        );

        reply.map(|text| OutboundMessage {
            recipient: sender,
            text,
        })
    }

    async fn handle_command(&mut self, sender: SessionId, command: Command) -> Option<String> {
        let session = self.sessions.get_or_create(sender);

        match command {
            Command::Join => {
                if let Some(table_id) = session.table_id() {
                    return Some(replies::already_seated(table_id));
                }

                let table_id = self.tables.allocate_id();
                let (actor, handle) =
                    TableActor::new(table_id, sender, &self.config.table, (self.opponents)());
                tokio::spawn(actor.run());
                self.tables.insert(handle);
                session.seat(table_id);

                Some(replies::seated(table_id))
            }

            Command::Exit => {
                // Capture the table before the session forgets it
                let Some(table_id) = session.leave() else {
                    return Some(replies::NOT_SEATED.to_string());
                };

                let mut text = replies::left(table_id);
                match self.tables.remove(table_id) {
                    Some(handle) => {
                        for report in handle.stop().await {
                            session.record_settled(&report);
                            text.push('\n');
                            text.push_str(&report.text());
                        }
                    }
                    None => log::warn!(
                        "Session {} left table {} which was not registered",
                        sender,
                        table_id
                    ),
                }

                Some(text)
            }

            Command::Play(choice) => {
                let Some(table_id) = session.table_id() else {
                    return Some(replies::NOT_SEATED.to_string());
                };
                let Some(handle) = self.tables.get(table_id) else {
                    log::warn!(
                        "Session {} points at unknown table {}, unseating",
                        sender,
                        table_id
                    );
                    session.leave();
                    return Some(replies::NOT_SEATED.to_string());
                };

                match handle.forward(TableCommand::Play {
                    session: sender,
                    choice,
                }) {
                    Ok(()) => None,
                    Err(TableError::InboxFull(_)) => {
                        log::warn!("Table {} inbox full, turning away {}", table_id, choice);
                        Some(replies::table_busy(table_id))
                    }
                    Err(TableError::Closed(_)) => {
                        log::error!("Table {} is gone, unseating session {}", table_id, sender);
                        self.tables.remove(table_id);
                        session.leave();
                        Some(replies::table_lost(table_id))
                    }
                }
            }
        }
    }

    fn handle_drained(&mut self, drained: Drained) -> OutboundMessage {
        match drained {
            Drained::Report {
                table_id,
                owner,
                report,
            } => {
                self.sessions.get_or_create(owner).record(&report);
                let text = report.text();
                log::info!("[{}] table:{} output:{}", owner, table_id, text);

                OutboundMessage {
                    recipient: owner,
                    text,
                }
            }

            Drained::Closed { table_id, owner } => {
                log::error!("Table {} of session {} stopped unexpectedly", table_id, owner);
                self.tables.remove(table_id);

                let session = self.sessions.get_or_create(owner);
                if session.table_id() == Some(table_id) {
                    session.leave();
                }

                OutboundMessage {
                    recipient: owner,
                    text: replies::table_lost(table_id),
                }
            }
        }
    }

    async fn deliver(&self, reply: &OutboundMessage) -> Result<(), DispatchError> {
        let Err(e) = self.outbound.deliver(reply.recipient, &reply.text).await else {
            return Ok(());
        };

        match self.config.delivery_policy {
            DeliveryPolicy::Abort => {
                log::error!("Delivery to {} failed, stopping: {}", reply.recipient, e);
                Err(e.into())
            }
            DeliveryPolicy::LogAndContinue => {
                log::error!("Delivery to {} failed: {}", reply.recipient, e);
                Ok(())
            }
        }
    }
}
