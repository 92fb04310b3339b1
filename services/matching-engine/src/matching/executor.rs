//! Trade construction
//!
//! Allocates match numbers and builds immutable trade records. The
//! executor owns the match-number counter: strictly increasing, never
//! reused, one allocation per matching event.

use types::ids::{Instrument, MatchNumber, OrderNumber, SessionId};
use types::numeric::{Price, Quantity};
use types::trade::Trade;

/// Builds trades and allocates match numbers.
#[derive(Debug)]
pub struct MatchExecutor {
    next_match_number: u64,
}

impl MatchExecutor {
    /// Create an executor whose first trade gets `starting_match_number`.
    pub fn new(starting_match_number: u64) -> Self {
        Self {
            next_match_number: starting_match_number,
        }
    }

    fn next_match_number(&mut self) -> MatchNumber {
        let number = MatchNumber::new(self.next_match_number);
        self.next_match_number += 1;
        number
    }

    /// Record one matching event between a buy and a sell order.
    ///
    /// `price` is the execution price, always the resting order's price.
    #[allow(clippy::too_many_arguments)]
    pub fn execute(
        &mut self,
        instrument: Instrument,
        quantity: Quantity,
        price: Price,
        buyer: SessionId,
        buy_order_number: OrderNumber,
        seller: SessionId,
        sell_order_number: OrderNumber,
        timestamp_nanos: u64,
    ) -> Trade {
        Trade::new(
            self.next_match_number(),
            instrument,
            quantity,
            price,
            buyer,
            buy_order_number,
            seller,
            sell_order_number,
            timestamp_nanos,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn execute_sample(executor: &mut MatchExecutor) -> Trade {
        executor.execute(
            Instrument::new(1),
            Quantity::new(10),
            Price::from_ticks(100),
            SessionId::new(1),
            OrderNumber::new(11),
            SessionId::new(2),
            OrderNumber::new(12),
            1708123456789000000,
        )
    }

    #[test]
    fn test_execute_builds_trade() {
        let mut executor = MatchExecutor::new(1000);
        let trade = execute_sample(&mut executor);

        assert_eq!(trade.match_number, MatchNumber::new(1000));
        assert_eq!(trade.price, Price::from_ticks(100));
        assert_eq!(trade.quantity, Quantity::new(10));
        assert_eq!(trade.buyer, SessionId::new(1));
        assert_eq!(trade.seller, SessionId::new(2));
    }

    #[test]
    fn test_match_numbers_strictly_increasing() {
        let mut executor = MatchExecutor::new(1);
        let first = execute_sample(&mut executor);
        let second = execute_sample(&mut executor);
        assert_eq!(first.match_number, MatchNumber::new(1));
        assert_eq!(second.match_number, MatchNumber::new(2));
    }
}
