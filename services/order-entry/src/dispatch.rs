//! Engine dispatch task
//!
//! One task owns the matching engine, the session response registry, and
//! both feed producers. Every book mutation flows through its single
//! event queue, so per-session command order and per-instrument
//! linearization follow from channel FIFO ordering alone. Sessions and
//! feeds never touch the book.

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use market_data::MarketDataServer;
use matching_engine::{Command, MatchingEngine, Reply, TopOfBook};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use trade_reports::TradeReportServer;
use tracing::{debug, info, warn};
use types::ids::{Instrument, SessionId};

use crate::codec::OutboundMessage;

/// Events consumed by the engine task.
#[derive(Debug)]
pub enum EngineEvent {
    /// A session connected; responses for it go down `replies`.
    SessionOpened {
        session: SessionId,
        replies: mpsc::UnboundedSender<OutboundMessage>,
    },
    /// A decoded command from a session.
    Command {
        session: SessionId,
        token: u64,
        command: Command,
    },
    /// A session disconnected; its resting orders are canceled.
    SessionClosed { session: SessionId },
}

/// The engine task state.
pub struct Dispatcher {
    engine: MatchingEngine,
    sessions: HashMap<SessionId, mpsc::UnboundedSender<OutboundMessage>>,
    market_data: MarketDataServer,
    trade_reports: TradeReportServer,
}

impl Dispatcher {
    pub fn new(
        instruments: impl IntoIterator<Item = Instrument>,
        market_data: MarketDataServer,
        trade_reports: TradeReportServer,
    ) -> Self {
        Self {
            engine: MatchingEngine::new(instruments),
            sessions: HashMap::new(),
            market_data,
            trade_reports,
        }
    }

    /// Spawn the task, returning its event queue.
    pub fn spawn(self) -> (mpsc::UnboundedSender<EngineEvent>, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(self.run(rx));
        (tx, task)
    }

    /// Consume events until every event sender is dropped.
    pub async fn run(mut self, mut rx: mpsc::UnboundedReceiver<EngineEvent>) {
        while let Some(event) = rx.recv().await {
            self.handle_event(event);
        }
        info!("Engine dispatcher stopped");
    }

    pub fn handle_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::SessionOpened { session, replies } => {
                debug!(session = %session, "Session registered");
                self.sessions.insert(session, replies);
            }
            EngineEvent::Command {
                session,
                token,
                command,
            } => self.handle_command(session, token, command),
            EngineEvent::SessionClosed { session } => self.handle_close(session),
        }
    }

    fn handle_command(&mut self, session: SessionId, token: u64, command: Command) {
        let outcome = self.engine.submit(session, command, now_nanos());

        let response = match outcome.reply {
            Reply::Accepted { order_number } => OutboundMessage::Accepted {
                token,
                order_number,
            },
            Reply::Canceled { order_number } => OutboundMessage::Canceled {
                token,
                order_number,
            },
            Reply::Replaced { order_number } => OutboundMessage::Replaced {
                token,
                order_number,
            },
            Reply::Rejected { reason } => OutboundMessage::Rejected { token, reason },
        };
        self.send_to_session(session, response);

        for execution in &outcome.executions {
            self.send_to_session(
                execution.session,
                OutboundMessage::Executed {
                    order_number: execution.order_number,
                    quantity: execution.quantity,
                    price: execution.price,
                    match_number: execution.match_number,
                },
            );
        }

        for trade in &outcome.trades {
            if let Err(error) = self.trade_reports.publish_trade(trade) {
                warn!(%error, "Trade report publish failed");
            }
            if let Err(error) = self.market_data.publish_trade_tick(trade) {
                warn!(%error, "Trade tick publish failed");
            }
        }

        if let Some(top) = outcome.book_update {
            self.publish_top(top);
        }
    }

    fn handle_close(&mut self, session: SessionId) {
        self.sessions.remove(&session);
        let outcome = self.engine.session_closed(session);
        if !outcome.canceled.is_empty() {
            info!(
                session = %session,
                canceled = outcome.canceled.len(),
                "Canceled resting orders for closed session"
            );
        }
        for top in outcome.book_updates {
            self.publish_top(top);
        }
    }

    fn publish_top(&self, top: TopOfBook) {
        if let Err(error) = self
            .market_data
            .publish_top_of_book(top.instrument, top.bid, top.ask)
        {
            warn!(%error, "Top-of-book publish failed");
        }
    }

    /// A send failure only means the session disconnected while its
    /// response was in flight; teardown arrives as a `SessionClosed`.
    fn send_to_session(&self, session: SessionId, message: OutboundMessage) {
        if let Some(replies) = self.sessions.get(&session) {
            if replies.send(message).is_err() {
                debug!(session = %session, "Dropping response for disconnected session");
            }
        }
    }
}

fn now_nanos() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos() as u64
}
