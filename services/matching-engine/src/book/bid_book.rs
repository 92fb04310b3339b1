//! Bid (buy-side) order book
//!
//! Buy orders keyed by price; the highest price is the best bid. Uses
//! BTreeMap for deterministic iteration, with FIFO queues per level.

use std::collections::BTreeMap;
use types::ids::OrderNumber;
use types::numeric::{Price, Quantity};

use super::price_level::PriceLevel;

/// Buy side of one instrument's book.
#[derive(Debug, Clone, Default)]
pub struct BidBook {
    /// Price levels; `next_back` is the best bid.
    levels: BTreeMap<Price, PriceLevel>,
}

impl BidBook {
    pub fn new() -> Self {
        Self {
            levels: BTreeMap::new(),
        }
    }

    /// Add an order at the back of its price level's queue.
    pub fn insert(&mut self, order_number: OrderNumber, price: Price, remaining: Quantity) {
        self.levels
            .entry(price)
            .or_default()
            .insert(order_number, remaining);
    }

    /// Remove an order; empty levels are dropped from the book.
    pub fn remove(&mut self, order_number: OrderNumber, price: Price, remaining: Quantity) -> bool {
        let Some(level) = self.levels.get_mut(&price) else {
            return false;
        };
        if !level.remove(order_number, remaining) {
            return false;
        }
        if level.is_empty() {
            self.levels.remove(&price);
        }
        true
    }

    /// Best bid price and total quantity at that level.
    pub fn best_bid(&self) -> Option<(Price, Quantity)> {
        self.levels
            .iter()
            .next_back()
            .map(|(price, level)| (*price, level.total_quantity()))
    }

    pub fn best_bid_price(&self) -> Option<Price> {
        self.levels.keys().next_back().copied()
    }

    /// Mutable access to a specific price level.
    pub(crate) fn level_mut(&mut self, price: Price) -> Option<&mut PriceLevel> {
        self.levels.get_mut(&price)
    }

    /// Drop a level that has become empty.
    pub(crate) fn remove_level_if_empty(&mut self, price: Price) {
        if self.levels.get(&price).is_some_and(|l| l.is_empty()) {
            self.levels.remove(&price);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(v: u64) -> OrderNumber {
        OrderNumber::new(v)
    }

    #[test]
    fn test_best_bid_is_highest_price() {
        let mut book = BidBook::new();
        book.insert(n(1), Price::from_ticks(100), Quantity::new(10));
        book.insert(n(2), Price::from_ticks(101), Quantity::new(5));
        book.insert(n(3), Price::from_ticks(99), Quantity::new(7));

        assert_eq!(
            book.best_bid(),
            Some((Price::from_ticks(101), Quantity::new(5)))
        );
    }

    #[test]
    fn test_remove_drops_empty_level() {
        let mut book = BidBook::new();
        book.insert(n(1), Price::from_ticks(100), Quantity::new(10));

        assert!(book.remove(n(1), Price::from_ticks(100), Quantity::new(10)));
        assert!(book.is_empty());
        assert!(!book.remove(n(1), Price::from_ticks(100), Quantity::new(10)));
    }

    #[test]
    fn test_same_price_shares_level() {
        let mut book = BidBook::new();
        book.insert(n(1), Price::from_ticks(100), Quantity::new(10));
        book.insert(n(2), Price::from_ticks(100), Quantity::new(20));

        assert_eq!(book.level_count(), 1);
        assert_eq!(
            book.best_bid(),
            Some((Price::from_ticks(100), Quantity::new(30)))
        );
    }
}
