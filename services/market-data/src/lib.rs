//! Market data service
//!
//! Publishes anonymous market state over a sequenced multicast feed:
//! best bid and offer after every book change, and a trade tick per
//! matching event. Records carry no participant identities; private
//! fills go to owning sessions over order entry instead.

pub mod records;
pub mod server;

pub use records::{BboRecord, MarketDataRecord, RecordError, TradeTickRecord};
pub use server::MarketDataServer;
