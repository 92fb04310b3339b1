//! Command and event structures for the matching engine
//!
//! The engine consumes validated commands and returns everything the
//! surrounding servers need as plain values: the synchronous reply for
//! the submitting session, executions addressed to owning sessions,
//! trade records for the trade-report feed, and top-of-book updates for
//! the market-data feed.

use serde::{Deserialize, Serialize};
use types::errors::RejectReason;
use types::ids::{Instrument, MatchNumber, OrderNumber, SessionId};
use types::numeric::{Price, Quantity};
use types::order::Side;
use types::trade::Trade;

/// A validated order-entry command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    Enter {
        instrument: Instrument,
        side: Side,
        price: Price,
        quantity: Quantity,
    },
    Cancel {
        order_number: OrderNumber,
    },
    Replace {
        order_number: OrderNumber,
        quantity: Quantity,
        price: Price,
    },
}

/// Synchronous reply to the submitting session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reply {
    Accepted { order_number: OrderNumber },
    Canceled { order_number: OrderNumber },
    Replaced { order_number: OrderNumber },
    Rejected { reason: RejectReason },
}

/// One fill, addressed to the session owning the filled order.
///
/// Every matching event produces two executions, one per counterparty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Execution {
    pub session: SessionId,
    pub order_number: OrderNumber,
    pub quantity: Quantity,
    pub price: Price,
    pub match_number: MatchNumber,
}

/// Best bid and offer after a book mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopOfBook {
    pub instrument: Instrument,
    pub bid: Option<(Price, Quantity)>,
    pub ask: Option<(Price, Quantity)>,
}

/// Everything produced by one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    pub reply: Reply,
    pub executions: Vec<Execution>,
    pub trades: Vec<Trade>,
    /// Present when the command mutated the book.
    pub book_update: Option<TopOfBook>,
}

impl CommandOutcome {
    /// A rejection: nothing was applied, nothing to publish.
    pub fn rejected(reason: RejectReason) -> Self {
        Self {
            reply: Reply::Rejected { reason },
            executions: Vec::new(),
            trades: Vec::new(),
            book_update: None,
        }
    }
}

/// Result of tearing down a session's resting orders.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionCloseOutcome {
    /// Orders canceled by the teardown.
    pub canceled: Vec<OrderNumber>,
    /// One update per instrument whose book changed.
    pub book_updates: Vec<TopOfBook>,
}
