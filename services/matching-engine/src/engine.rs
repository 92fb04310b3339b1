//! Matching engine core
//!
//! Single source of truth for order-number and match-number allocation
//! and for all book mutation. One engine instance is driven by exactly
//! one thread of control; every command is processed to completion
//! before the next, which is what makes time priority a simple
//! arrival-sequence comparison.

use std::collections::{BTreeSet, HashMap};

use types::errors::RejectReason;
use types::ids::{Instrument, OrderNumber, SessionId};
use types::numeric::{Price, Quantity};
use types::order::{Order, Side};
use types::trade::Trade;

use crate::book::OrderBook;
use crate::events::{Command, CommandOutcome, Execution, Reply, SessionCloseOutcome, TopOfBook};
use crate::matching::{crossing, executor::MatchExecutor};

/// Price-time-priority matching engine for a configured instrument set.
pub struct MatchingEngine {
    /// One book per tradable instrument; the set is fixed at startup.
    books: HashMap<Instrument, OrderBook>,
    /// Arena of resting orders indexed by order number.
    orders: HashMap<OrderNumber, Order>,
    /// Match-number allocation and trade construction.
    executor: MatchExecutor,
    next_order_number: u64,
    next_entry_sequence: u64,
}

impl MatchingEngine {
    /// Create an engine trading the given instruments.
    pub fn new(instruments: impl IntoIterator<Item = Instrument>) -> Self {
        let books = instruments
            .into_iter()
            .map(|instrument| (instrument, OrderBook::new(instrument)))
            .collect();
        Self {
            books,
            orders: HashMap::new(),
            executor: MatchExecutor::new(1),
            next_order_number: 1,
            next_entry_sequence: 1,
        }
    }

    /// Process one validated command from a session.
    ///
    /// This is the main entry point. The command is fully applied (or
    /// rejected untouched) before this returns; the outcome carries the
    /// session reply plus everything to publish.
    pub fn submit(
        &mut self,
        session: SessionId,
        command: Command,
        timestamp_nanos: u64,
    ) -> CommandOutcome {
        match command {
            Command::Enter {
                instrument,
                side,
                price,
                quantity,
            } => self.enter(session, instrument, side, price, quantity, timestamp_nanos),
            Command::Cancel { order_number } => self.cancel(session, order_number),
            Command::Replace {
                order_number,
                quantity,
                price,
            } => self.replace(session, order_number, quantity, price, timestamp_nanos),
        }
    }

    /// Cancel every resting order owned by a closed session.
    pub fn session_closed(&mut self, session: SessionId) -> SessionCloseOutcome {
        let owned: Vec<OrderNumber> = self
            .orders
            .values()
            .filter(|order| order.session == session)
            .map(|order| order.order_number)
            .collect();

        let mut outcome = SessionCloseOutcome::default();
        let mut touched: BTreeSet<Instrument> = BTreeSet::new();

        for order_number in owned {
            let order = self
                .orders
                .remove(&order_number)
                .expect("owned order vanished from arena");
            self.remove_from_book(&order);
            touched.insert(order.instrument);
            outcome.canceled.push(order_number);
        }
        outcome.canceled.sort();

        for instrument in touched {
            if let Some(update) = self.top_of_book(instrument) {
                outcome.book_updates.push(update);
            }
        }
        outcome
    }

    /// Current best bid and offer for an instrument.
    pub fn top_of_book(&self, instrument: Instrument) -> Option<TopOfBook> {
        self.books.get(&instrument).map(|book| {
            let (bid, ask) = book.top_of_book();
            TopOfBook {
                instrument,
                bid,
                ask,
            }
        })
    }

    /// Number of resting orders across all books.
    pub fn open_order_count(&self) -> usize {
        self.orders.len()
    }

    fn enter(
        &mut self,
        session: SessionId,
        instrument: Instrument,
        side: Side,
        price: Price,
        quantity: Quantity,
        timestamp_nanos: u64,
    ) -> CommandOutcome {
        if quantity.is_zero() {
            return CommandOutcome::rejected(RejectReason::InvalidQuantity);
        }
        if !self.books.contains_key(&instrument) {
            return CommandOutcome::rejected(RejectReason::UnknownInstrument);
        }

        let order_number = self.next_order_number();
        let entry_sequence = self.next_entry_sequence();
        let order = Order::new(
            order_number,
            session,
            instrument,
            side,
            price,
            quantity,
            entry_sequence,
        );

        let (executions, trades) = self.match_and_rest(order, timestamp_nanos);

        CommandOutcome {
            reply: Reply::Accepted { order_number },
            executions,
            trades,
            book_update: self.top_of_book(instrument),
        }
    }

    fn cancel(&mut self, session: SessionId, order_number: OrderNumber) -> CommandOutcome {
        match self.orders.get(&order_number) {
            None => return CommandOutcome::rejected(RejectReason::OrderNotFound),
            Some(order) if order.session != session => {
                return CommandOutcome::rejected(RejectReason::NotOrderOwner)
            }
            Some(_) => {}
        }

        let order = self
            .orders
            .remove(&order_number)
            .expect("checked order vanished from arena");
        self.remove_from_book(&order);

        CommandOutcome {
            reply: Reply::Canceled { order_number },
            executions: Vec::new(),
            trades: Vec::new(),
            book_update: self.top_of_book(order.instrument),
        }
    }

    fn replace(
        &mut self,
        session: SessionId,
        order_number: OrderNumber,
        new_quantity: Quantity,
        new_price: Price,
        timestamp_nanos: u64,
    ) -> CommandOutcome {
        match self.orders.get(&order_number) {
            None => return CommandOutcome::rejected(RejectReason::OrderNotFound),
            Some(order) if order.session != session => {
                return CommandOutcome::rejected(RejectReason::NotOrderOwner)
            }
            Some(_) => {}
        }
        if new_quantity.is_zero() {
            return CommandOutcome::rejected(RejectReason::InvalidQuantity);
        }

        let existing = self
            .orders
            .get(&order_number)
            .expect("checked order vanished from arena");
        let instrument = existing.instrument;
        let side = existing.side;
        let old_price = existing.price;
        let old_remaining = existing.quantity;

        let mut executions = Vec::new();
        let mut trades = Vec::new();

        if new_price != old_price {
            // Price change: cancel-then-new through a full matching pass.
            // The order keeps its number but loses time priority and may
            // trade immediately at its new price.
            let order = self
                .orders
                .remove(&order_number)
                .expect("checked order vanished from arena");
            self.remove_from_book(&order);

            let entry_sequence = self.next_entry_sequence();
            let replacement = Order::new(
                order_number,
                session,
                instrument,
                side,
                new_price,
                new_quantity,
                entry_sequence,
            );
            let (matched_executions, matched_trades) =
                self.match_and_rest(replacement, timestamp_nanos);
            executions = matched_executions;
            trades = matched_trades;
        } else if new_quantity < old_remaining {
            // Quantity reduction at unchanged price keeps time priority.
            let reduction = old_remaining.saturating_sub(new_quantity);
            let order = self
                .orders
                .get_mut(&order_number)
                .expect("checked order vanished from arena");
            order.quantity = new_quantity;
            order.original_quantity = new_quantity;
            let book = self
                .books
                .get_mut(&instrument)
                .expect("order references unknown instrument");
            let level = match side {
                Side::Buy => book.bids.level_mut(old_price),
                Side::Sell => book.asks.level_mut(old_price),
            }
            .expect("resting order has no price level");
            level.reduce(reduction);
        } else if new_quantity > old_remaining {
            // Quantity increase at unchanged price loses time priority:
            // the order moves to the back of its level's queue.
            let entry_sequence = self.next_entry_sequence();
            let order = self
                .orders
                .get_mut(&order_number)
                .expect("checked order vanished from arena");
            order.quantity = new_quantity;
            order.original_quantity = new_quantity;
            order.entry_sequence = entry_sequence;
            let book = self
                .books
                .get_mut(&instrument)
                .expect("order references unknown instrument");
            match side {
                Side::Buy => {
                    book.bids.remove(order_number, old_price, old_remaining);
                    book.bids.insert(order_number, old_price, new_quantity);
                }
                Side::Sell => {
                    book.asks.remove(order_number, old_price, old_remaining);
                    book.asks.insert(order_number, old_price, new_quantity);
                }
            }
        }
        // new_quantity == old_remaining at the same price is a no-op.

        CommandOutcome {
            reply: Reply::Replaced { order_number },
            executions,
            trades,
            book_update: self.top_of_book(instrument),
        }
    }

    /// Match an incoming order against the opposite side, then rest any
    /// remainder at its price.
    fn match_and_rest(
        &mut self,
        mut incoming: Order,
        timestamp_nanos: u64,
    ) -> (Vec<Execution>, Vec<Trade>) {
        let mut executions = Vec::new();
        let mut trades = Vec::new();

        // Split borrows: book + arena + executor separately.
        let book = self
            .books
            .get_mut(&incoming.instrument)
            .expect("instrument validated before matching");
        let orders = &mut self.orders;
        let executor = &mut self.executor;

        while !incoming.is_filled() {
            let resting_price = match incoming.side {
                Side::Buy => book.asks.best_ask_price(),
                Side::Sell => book.bids.best_bid_price(),
            };
            let Some(resting_price) = resting_price else {
                break;
            };
            if !crossing::incoming_can_match(incoming.side, incoming.price, resting_price) {
                break;
            }

            let level = match incoming.side {
                Side::Buy => book.asks.level_mut(resting_price),
                Side::Sell => book.bids.level_mut(resting_price),
            }
            .expect("best price has no level");
            let resting_number = level.front().expect("non-empty level has no front");

            let resting = orders
                .get_mut(&resting_number)
                .expect("level references unknown order");

            // Oldest resting order at the best level trades first, at
            // its own price.
            let fill = incoming.quantity.min(resting.quantity);
            let trade = match incoming.side {
                Side::Buy => executor.execute(
                    incoming.instrument,
                    fill,
                    resting_price,
                    incoming.session,
                    incoming.order_number,
                    resting.session,
                    resting.order_number,
                    timestamp_nanos,
                ),
                Side::Sell => executor.execute(
                    incoming.instrument,
                    fill,
                    resting_price,
                    resting.session,
                    resting.order_number,
                    incoming.session,
                    incoming.order_number,
                    timestamp_nanos,
                ),
            };

            executions.push(Execution {
                session: incoming.session,
                order_number: incoming.order_number,
                quantity: fill,
                price: resting_price,
                match_number: trade.match_number,
            });
            executions.push(Execution {
                session: resting.session,
                order_number: resting.order_number,
                quantity: fill,
                price: resting_price,
                match_number: trade.match_number,
            });
            trades.push(trade);

            incoming.fill(fill);
            resting.fill(fill);
            level.reduce(fill);

            if resting.is_filled() {
                level.pop_front(Quantity::zero());
                orders.remove(&resting_number);
                match incoming.side {
                    Side::Buy => book.asks.remove_level_if_empty(resting_price),
                    Side::Sell => book.bids.remove_level_if_empty(resting_price),
                }
            }
        }

        if !incoming.is_filled() {
            match incoming.side {
                Side::Buy => book
                    .bids
                    .insert(incoming.order_number, incoming.price, incoming.quantity),
                Side::Sell => book
                    .asks
                    .insert(incoming.order_number, incoming.price, incoming.quantity),
            }
            orders.insert(incoming.order_number, incoming);
        }

        debug_assert!(!book.is_crossed(), "book left crossed after matching");

        (executions, trades)
    }

    fn remove_from_book(&mut self, order: &Order) {
        let book = self
            .books
            .get_mut(&order.instrument)
            .expect("order references unknown instrument");
        let removed = match order.side {
            Side::Buy => book
                .bids
                .remove(order.order_number, order.price, order.quantity),
            Side::Sell => book
                .asks
                .remove(order.order_number, order.price, order.quantity),
        };
        debug_assert!(removed, "arena and book disagree on resting order");
    }

    fn next_order_number(&mut self) -> OrderNumber {
        let number = OrderNumber::new(self.next_order_number);
        self.next_order_number += 1;
        number
    }

    fn next_entry_sequence(&mut self) -> u64 {
        let sequence = self.next_entry_sequence;
        self.next_entry_sequence += 1;
        sequence
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TS: u64 = 1708123456789000000;

    fn engine() -> MatchingEngine {
        MatchingEngine::new([Instrument::new(1)])
    }

    fn enter(side: Side, quantity: u64, price: i64) -> Command {
        Command::Enter {
            instrument: Instrument::new(1),
            side,
            price: Price::from_ticks(price),
            quantity: Quantity::new(quantity),
        }
    }

    fn accepted_number(outcome: &CommandOutcome) -> OrderNumber {
        match outcome.reply {
            Reply::Accepted { order_number } => order_number,
            ref other => panic!("expected Accepted, got {other:?}"),
        }
    }

    #[test]
    fn test_resting_order_no_match() {
        let mut engine = engine();
        let outcome = engine.submit(SessionId::new(1), enter(Side::Buy, 10, 100), TS);

        assert!(matches!(outcome.reply, Reply::Accepted { .. }));
        assert!(outcome.trades.is_empty());
        assert_eq!(engine.open_order_count(), 1);

        let top = outcome.book_update.unwrap();
        assert_eq!(top.bid, Some((Price::from_ticks(100), Quantity::new(10))));
        assert_eq!(top.ask, None);
    }

    #[test]
    fn test_unknown_instrument_rejected() {
        let mut engine = engine();
        let outcome = engine.submit(
            SessionId::new(1),
            Command::Enter {
                instrument: Instrument::new(99),
                side: Side::Buy,
                price: Price::from_ticks(100),
                quantity: Quantity::new(10),
            },
            TS,
        );
        assert_eq!(
            outcome.reply,
            Reply::Rejected {
                reason: RejectReason::UnknownInstrument
            }
        );
        assert!(outcome.book_update.is_none());
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let mut engine = engine();
        let outcome = engine.submit(SessionId::new(1), enter(Side::Sell, 0, 100), TS);
        assert_eq!(
            outcome.reply,
            Reply::Rejected {
                reason: RejectReason::InvalidQuantity
            }
        );
    }

    #[test]
    fn test_full_cross_empties_both_books() {
        // Buy 10@100, then Sell 10@100: one trade of 10 at 100, both
        // books empty afterward.
        let mut engine = engine();
        let buy = engine.submit(SessionId::new(1), enter(Side::Buy, 10, 100), TS);
        let buy_number = accepted_number(&buy);

        let sell = engine.submit(SessionId::new(2), enter(Side::Sell, 10, 100), TS + 1);
        let sell_number = accepted_number(&sell);

        assert_eq!(sell.trades.len(), 1);
        let trade = sell.trades[0];
        assert_eq!(trade.quantity, Quantity::new(10));
        assert_eq!(trade.price, Price::from_ticks(100));
        assert_eq!(trade.buy_order_number, buy_number);
        assert_eq!(trade.sell_order_number, sell_number);
        assert_eq!(trade.buyer, SessionId::new(1));
        assert_eq!(trade.seller, SessionId::new(2));

        assert_eq!(engine.open_order_count(), 0);
        let top = sell.book_update.unwrap();
        assert_eq!(top.bid, None);
        assert_eq!(top.ask, None);
    }

    #[test]
    fn test_price_priority_sweep() {
        // Buy 5@101, Buy 5@100, then Sell 7@100: first trade 5@101
        // against the better-priced bid, second trade 2@100; a bid of
        // 3@100 remains.
        let mut engine = engine();
        engine.submit(SessionId::new(1), enter(Side::Buy, 5, 101), TS);
        engine.submit(SessionId::new(1), enter(Side::Buy, 5, 100), TS + 1);

        let sell = engine.submit(SessionId::new(2), enter(Side::Sell, 7, 100), TS + 2);

        assert_eq!(sell.trades.len(), 2);
        assert_eq!(sell.trades[0].quantity, Quantity::new(5));
        assert_eq!(sell.trades[0].price, Price::from_ticks(101));
        assert_eq!(sell.trades[1].quantity, Quantity::new(2));
        assert_eq!(sell.trades[1].price, Price::from_ticks(100));

        let top = sell.book_update.unwrap();
        assert_eq!(top.bid, Some((Price::from_ticks(100), Quantity::new(3))));
        assert_eq!(top.ask, None);
    }

    #[test]
    fn test_time_priority_within_level() {
        let mut engine = engine();
        let first = accepted_number(&engine.submit(SessionId::new(1), enter(Side::Buy, 5, 100), TS));
        let second =
            accepted_number(&engine.submit(SessionId::new(2), enter(Side::Buy, 5, 100), TS + 1));

        let sell = engine.submit(SessionId::new(3), enter(Side::Sell, 6, 100), TS + 2);
        assert_eq!(sell.trades.len(), 2);
        // Oldest order at the level fills first and completely.
        assert_eq!(sell.trades[0].buy_order_number, first);
        assert_eq!(sell.trades[0].quantity, Quantity::new(5));
        assert_eq!(sell.trades[1].buy_order_number, second);
        assert_eq!(sell.trades[1].quantity, Quantity::new(1));
    }

    #[test]
    fn test_execution_price_favors_resting_order() {
        let mut engine = engine();
        engine.submit(SessionId::new(1), enter(Side::Sell, 10, 100), TS);

        // Aggressive buy at 105 still executes at the resting 100.
        let buy = engine.submit(SessionId::new(2), enter(Side::Buy, 10, 105), TS + 1);
        assert_eq!(buy.trades[0].price, Price::from_ticks(100));
    }

    #[test]
    fn test_executions_address_both_sessions() {
        let mut engine = engine();
        engine.submit(SessionId::new(1), enter(Side::Buy, 10, 100), TS);
        let sell = engine.submit(SessionId::new(2), enter(Side::Sell, 10, 100), TS + 1);

        assert_eq!(sell.executions.len(), 2);
        let sessions: Vec<SessionId> = sell.executions.iter().map(|e| e.session).collect();
        assert!(sessions.contains(&SessionId::new(1)));
        assert!(sessions.contains(&SessionId::new(2)));
        assert_eq!(sell.executions[0].match_number, sell.executions[1].match_number);
    }

    #[test]
    fn test_cancel_resting_order() {
        let mut engine = engine();
        let number = accepted_number(&engine.submit(SessionId::new(1), enter(Side::Buy, 10, 100), TS));

        let outcome = engine.submit(
            SessionId::new(1),
            Command::Cancel {
                order_number: number,
            },
            TS + 1,
        );
        assert_eq!(
            outcome.reply,
            Reply::Canceled {
                order_number: number
            }
        );
        assert_eq!(engine.open_order_count(), 0);
        assert_eq!(outcome.book_update.unwrap().bid, None);
    }

    #[test]
    fn test_cancel_not_found_and_not_owner() {
        let mut engine = engine();
        let number = accepted_number(&engine.submit(SessionId::new(1), enter(Side::Buy, 10, 100), TS));

        let missing = engine.submit(
            SessionId::new(1),
            Command::Cancel {
                order_number: OrderNumber::new(999),
            },
            TS + 1,
        );
        assert_eq!(
            missing.reply,
            Reply::Rejected {
                reason: RejectReason::OrderNotFound
            }
        );

        let foreign = engine.submit(
            SessionId::new(2),
            Command::Cancel {
                order_number: number,
            },
            TS + 2,
        );
        assert_eq!(
            foreign.reply,
            Reply::Rejected {
                reason: RejectReason::NotOrderOwner
            }
        );
        // The order is still resting.
        assert_eq!(engine.open_order_count(), 1);
    }

    #[test]
    fn test_replace_quantity_reduction_keeps_priority() {
        let mut engine = engine();
        let first = accepted_number(&engine.submit(SessionId::new(1), enter(Side::Buy, 10, 100), TS));
        engine.submit(SessionId::new(2), enter(Side::Buy, 10, 100), TS + 1);

        let outcome = engine.submit(
            SessionId::new(1),
            Command::Replace {
                order_number: first,
                quantity: Quantity::new(4),
                price: Price::from_ticks(100),
            },
            TS + 2,
        );
        assert_eq!(outcome.reply, Reply::Replaced { order_number: first });
        assert_eq!(
            outcome.book_update.unwrap().bid,
            Some((Price::from_ticks(100), Quantity::new(14)))
        );

        // Reduced order still trades first at its level.
        let sell = engine.submit(SessionId::new(3), enter(Side::Sell, 5, 100), TS + 3);
        assert_eq!(sell.trades[0].buy_order_number, first);
        assert_eq!(sell.trades[0].quantity, Quantity::new(4));
    }

    #[test]
    fn test_replace_quantity_increase_loses_priority() {
        let mut engine = engine();
        let first = accepted_number(&engine.submit(SessionId::new(1), enter(Side::Buy, 5, 100), TS));
        let second =
            accepted_number(&engine.submit(SessionId::new(2), enter(Side::Buy, 5, 100), TS + 1));

        engine.submit(
            SessionId::new(1),
            Command::Replace {
                order_number: first,
                quantity: Quantity::new(8),
                price: Price::from_ticks(100),
            },
            TS + 2,
        );

        // The increased order queues behind the untouched one.
        let sell = engine.submit(SessionId::new(3), enter(Side::Sell, 5, 100), TS + 3);
        assert_eq!(sell.trades[0].buy_order_number, second);
    }

    #[test]
    fn test_replace_price_change_rematches() {
        let mut engine = engine();
        engine.submit(SessionId::new(1), enter(Side::Sell, 5, 102), TS);
        let buy = accepted_number(&engine.submit(SessionId::new(2), enter(Side::Buy, 5, 100), TS + 1));

        // Repricing the bid to 102 crosses the resting ask.
        let outcome = engine.submit(
            SessionId::new(2),
            Command::Replace {
                order_number: buy,
                quantity: Quantity::new(5),
                price: Price::from_ticks(102),
            },
            TS + 2,
        );
        assert_eq!(outcome.reply, Reply::Replaced { order_number: buy });
        assert_eq!(outcome.trades.len(), 1);
        assert_eq!(outcome.trades[0].price, Price::from_ticks(102));
        assert_eq!(engine.open_order_count(), 0);
    }

    #[test]
    fn test_replace_rejections() {
        let mut engine = engine();
        let number = accepted_number(&engine.submit(SessionId::new(1), enter(Side::Buy, 10, 100), TS));

        let foreign = engine.submit(
            SessionId::new(2),
            Command::Replace {
                order_number: number,
                quantity: Quantity::new(5),
                price: Price::from_ticks(100),
            },
            TS + 1,
        );
        assert_eq!(
            foreign.reply,
            Reply::Rejected {
                reason: RejectReason::NotOrderOwner
            }
        );

        let zero = engine.submit(
            SessionId::new(1),
            Command::Replace {
                order_number: number,
                quantity: Quantity::zero(),
                price: Price::from_ticks(100),
            },
            TS + 2,
        );
        assert_eq!(
            zero.reply,
            Reply::Rejected {
                reason: RejectReason::InvalidQuantity
            }
        );
    }

    #[test]
    fn test_order_numbers_strictly_increasing() {
        let mut engine = engine();
        let mut last = 0;
        for i in 0..10 {
            let outcome = engine.submit(SessionId::new(1), enter(Side::Buy, 1, 90 + i), TS);
            let number = accepted_number(&outcome).value();
            assert!(number > last);
            last = number;
        }
    }

    #[test]
    fn test_match_numbers_strictly_increasing_across_commands() {
        let mut engine = engine();
        engine.submit(SessionId::new(1), enter(Side::Buy, 5, 100), TS);
        engine.submit(SessionId::new(1), enter(Side::Buy, 5, 100), TS);
        let first = engine.submit(SessionId::new(2), enter(Side::Sell, 5, 100), TS);
        let second = engine.submit(SessionId::new(2), enter(Side::Sell, 5, 100), TS);

        assert!(second.trades[0].match_number > first.trades[0].match_number);
    }

    #[test]
    fn test_session_close_cancels_resting_orders() {
        let mut engine = engine();
        engine.submit(SessionId::new(1), enter(Side::Buy, 10, 100), TS);
        engine.submit(SessionId::new(1), enter(Side::Sell, 10, 105), TS + 1);
        engine.submit(SessionId::new(2), enter(Side::Buy, 3, 99), TS + 2);

        let outcome = engine.session_closed(SessionId::new(1));
        assert_eq!(outcome.canceled.len(), 2);
        assert_eq!(engine.open_order_count(), 1);

        let top = &outcome.book_updates[0];
        assert_eq!(top.bid, Some((Price::from_ticks(99), Quantity::new(3))));
        assert_eq!(top.ask, None);
    }

    #[test]
    fn test_partial_fill_updates_book_totals() {
        let mut engine = engine();
        engine.submit(SessionId::new(1), enter(Side::Sell, 10, 100), TS);

        let buy = engine.submit(SessionId::new(2), enter(Side::Buy, 4, 100), TS + 1);
        assert_eq!(buy.trades[0].quantity, Quantity::new(4));
        assert_eq!(
            buy.book_update.unwrap().ask,
            Some((Price::from_ticks(100), Quantity::new(6)))
        );
    }
}
