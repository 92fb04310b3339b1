//! Trade record types
//!
//! A trade is produced exactly once per matching event and is immutable
//! once created.

use crate::ids::{Instrument, MatchNumber, OrderNumber, SessionId};
use crate::numeric::{Price, Quantity};
use serde::{Deserialize, Serialize};

/// One executed match between a buy order and a sell order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    pub match_number: MatchNumber,
    pub instrument: Instrument,
    pub quantity: Quantity,
    /// Execution price; always the resting order's price.
    pub price: Price,
    pub buyer: SessionId,
    pub buy_order_number: OrderNumber,
    pub seller: SessionId,
    pub sell_order_number: OrderNumber,
    /// Nanoseconds since the Unix epoch.
    pub timestamp_nanos: u64,
}

impl Trade {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        match_number: MatchNumber,
        instrument: Instrument,
        quantity: Quantity,
        price: Price,
        buyer: SessionId,
        buy_order_number: OrderNumber,
        seller: SessionId,
        sell_order_number: OrderNumber,
        timestamp_nanos: u64,
    ) -> Self {
        Self {
            match_number,
            instrument,
            quantity,
            price,
            buyer,
            buy_order_number,
            seller,
            sell_order_number,
            timestamp_nanos,
        }
    }
}
