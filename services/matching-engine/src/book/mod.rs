//! Order book infrastructure module
//!
//! Contains price levels, bid book, ask book, and the per-instrument
//! book pairing both sides.

pub mod ask_book;
pub mod bid_book;
pub mod price_level;

pub use ask_book::AskBook;
pub use bid_book::BidBook;
pub use price_level::PriceLevel;

use types::ids::Instrument;
use types::numeric::{Price, Quantity};

/// Order book for a single instrument.
#[derive(Debug, Clone)]
pub struct OrderBook {
    pub instrument: Instrument,
    pub bids: BidBook,
    pub asks: AskBook,
}

impl OrderBook {
    pub fn new(instrument: Instrument) -> Self {
        Self {
            instrument,
            bids: BidBook::new(),
            asks: AskBook::new(),
        }
    }

    /// Best bid and best ask with their level totals.
    pub fn top_of_book(&self) -> (Option<(Price, Quantity)>, Option<(Price, Quantity)>) {
        (self.bids.best_bid(), self.asks.best_ask())
    }

    /// A book is crossed when best bid >= best ask; after a matching
    /// pass this must never hold.
    pub fn is_crossed(&self) -> bool {
        match (self.bids.best_bid_price(), self.asks.best_ask_price()) {
            (Some(bid), Some(ask)) => bid >= ask,
            _ => false,
        }
    }
}
