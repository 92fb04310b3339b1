//! Order lifecycle types

use crate::ids::{Instrument, OrderNumber, SessionId};
use crate::numeric::{Price, Quantity};
use serde::{Deserialize, Serialize};

/// Order side (buyer or seller)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// Buy order (bid)
    Buy,
    /// Sell order (ask)
    Sell,
}

impl Side {
    /// Get the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

/// A resting or incoming limit order.
///
/// Created on acceptance of an enter-order command; `quantity` is the
/// remaining open quantity and shrinks on partial fills. `entry_sequence`
/// is the engine-assigned arrival stamp that realizes time priority, so
/// FIFO within a price level does not depend on wall-clock time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub order_number: OrderNumber,
    pub session: SessionId,
    pub instrument: Instrument,
    pub side: Side,
    pub price: Price,
    pub quantity: Quantity,
    pub original_quantity: Quantity,
    pub entry_sequence: u64,
}

impl Order {
    pub fn new(
        order_number: OrderNumber,
        session: SessionId,
        instrument: Instrument,
        side: Side,
        price: Price,
        quantity: Quantity,
        entry_sequence: u64,
    ) -> Self {
        Self {
            order_number,
            session,
            instrument,
            side,
            price,
            quantity,
            original_quantity: quantity,
            entry_sequence,
        }
    }

    /// Quantity filled so far.
    pub fn filled_quantity(&self) -> Quantity {
        self.original_quantity.saturating_sub(self.quantity)
    }

    /// Check if the order has no remaining quantity.
    pub fn is_filled(&self) -> bool {
        self.quantity.is_zero()
    }

    /// Reduce remaining quantity by a fill.
    ///
    /// # Panics
    /// Panics if the fill exceeds the remaining quantity.
    pub fn fill(&mut self, fill_quantity: Quantity) {
        assert!(
            fill_quantity <= self.quantity,
            "Fill would exceed remaining quantity"
        );
        self.quantity = self.quantity.saturating_sub(fill_quantity);
    }
}
