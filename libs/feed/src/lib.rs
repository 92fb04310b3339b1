//! Sequenced multicast transport
//!
//! Generic reliable-multicast primitive: every outbound message gets a
//! strictly increasing sequence number, is published over UDP multicast,
//! and is retained for replay; subscribers that detect a sequence gap
//! issue unicast recovery requests served from the same retention log.
//!
//! **Key invariants:**
//! - Sequence numbers are strictly increasing from a configured base,
//!   with no gaps in what is sent
//! - Delivered (post-recovery) order equals publish order
//! - An evicted range gets a decisive "unavailable" reply, never silence

pub mod message;
pub mod publisher;
pub mod retention;
pub mod subscriber;

pub use message::{Packet, PacketBody, RecoveryRequest, SessionName};
pub use publisher::{FeedConfig, FeedHandle, FeedPublisher};
pub use retention::{RangeError, RetentionLog};
pub use subscriber::{Delivery, FeedSubscriber, GapTracker, RecoveryRange};

use thiserror::Error;

/// Transport-level errors.
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("truncated packet ({0} bytes)")]
    TruncatedPacket(usize),

    #[error("invalid session name: {0:?}")]
    InvalidSessionName(String),

    #[error("feed stream closed")]
    StreamClosed,

    #[error("recovery range unavailable; full resynchronization required")]
    RangeUnavailable,
}
