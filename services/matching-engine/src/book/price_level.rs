//! Price level with a FIFO order queue
//!
//! A price level holds the order numbers resting at one price, in strict
//! arrival order. The level stores indices into the engine's order arena
//! rather than order data, so cancel-by-id never chases pointers; the
//! running total quantity is maintained here for top-of-book reporting.

use std::collections::VecDeque;
use types::ids::OrderNumber;
use types::numeric::Quantity;

/// Orders resting at a single price, in FIFO order.
#[derive(Debug, Clone, Default)]
pub struct PriceLevel {
    /// Arena indices in arrival order.
    orders: VecDeque<OrderNumber>,
    /// Sum of remaining quantities at this level.
    total_quantity: Quantity,
}

impl PriceLevel {
    pub fn new() -> Self {
        Self {
            orders: VecDeque::new(),
            total_quantity: Quantity::zero(),
        }
    }

    /// Append an order at the back of the queue (time priority).
    pub fn insert(&mut self, order_number: OrderNumber, remaining: Quantity) {
        self.orders.push_back(order_number);
        self.total_quantity = self.total_quantity + remaining;
    }

    /// Remove an order from anywhere in the queue.
    ///
    /// `remaining` is the order's current remaining quantity, supplied by
    /// the caller from the arena. Returns false if the order is not at
    /// this level.
    pub fn remove(&mut self, order_number: OrderNumber, remaining: Quantity) -> bool {
        let Some(position) = self.orders.iter().position(|n| *n == order_number) else {
            return false;
        };
        self.orders.remove(position);
        self.total_quantity = self.total_quantity.saturating_sub(remaining);
        true
    }

    /// Order number at the front of the queue (oldest).
    pub fn front(&self) -> Option<OrderNumber> {
        self.orders.front().copied()
    }

    /// Remove the front order after it filled completely.
    pub fn pop_front(&mut self, remaining: Quantity) -> Option<OrderNumber> {
        let order_number = self.orders.pop_front()?;
        self.total_quantity = self.total_quantity.saturating_sub(remaining);
        Some(order_number)
    }

    /// Reduce the level total after a partial fill or in-place quantity
    /// reduction of one of its orders.
    pub fn reduce(&mut self, by: Quantity) {
        self.total_quantity = self.total_quantity.saturating_sub(by);
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn total_quantity(&self) -> Quantity {
        self.total_quantity
    }

    pub fn order_count(&self) -> usize {
        self.orders.len()
    }
}
