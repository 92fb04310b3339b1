//! Matching engine
//!
//! Continuous limit-order matching under price-time priority. The engine
//! is a purely synchronous state machine: it consumes one validated
//! command at a time, mutates its books, and returns a [`CommandOutcome`]
//! holding the session reply, executions, trades, and the resulting top
//! of book. Hosting it on a network front end is the order-entry
//! server's job.
//!
//! Order books keep only order numbers in their price levels; the order
//! data lives in an arena keyed by order number, which makes cancel and
//! replace lookups independent of book depth.

pub mod book;
pub mod engine;
pub mod events;
pub mod matching;

pub use book::OrderBook;
pub use engine::MatchingEngine;
pub use events::{
    Command, CommandOutcome, Execution, Reply, SessionCloseOutcome, TopOfBook,
};
