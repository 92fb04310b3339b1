//! Crossing detection logic
//!
//! Determines when an incoming order's price overlaps the opposite
//! side's best price, making an immediate trade possible.

use types::numeric::Price;
use types::order::Side;

/// Check if a bid and an ask can trade at the given prices.
pub fn can_match(bid_price: Price, ask_price: Price) -> bool {
    bid_price >= ask_price
}

/// Check if an incoming order crosses a resting order's price.
pub fn incoming_can_match(incoming_side: Side, incoming_price: Price, resting_price: Price) -> bool {
    match incoming_side {
        Side::Buy => incoming_price >= resting_price,
        Side::Sell => incoming_price <= resting_price,
    }
}
