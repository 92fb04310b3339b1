//! Order entry service
//!
//! The venue front end: accepts TCP order-entry sessions, hosts the
//! matching engine behind a single dispatch task, and produces the
//! market-data and trade-report multicast feeds.

pub mod codec;
pub mod config;
pub mod dispatch;
pub mod server;

pub use codec::{CodecError, InboundMessage, OutboundMessage};
pub use config::Config;
pub use dispatch::{Dispatcher, EngineEvent};
