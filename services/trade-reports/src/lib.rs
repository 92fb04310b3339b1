//! Trade report service
//!
//! Publishes one fully attributed record per matching event over its own
//! sequenced multicast feed, separate from the anonymous market-data
//! stream. Consumers that need participant identities (clearing,
//! surveillance) subscribe here.

pub mod records;
pub mod server;

pub use records::{RecordError, TradeReportRecord};
pub use server::TradeReportServer;
