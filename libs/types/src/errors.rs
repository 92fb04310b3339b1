//! Error taxonomy for order-entry commands
//!
//! Business rejections are typed values resolved at the point of detection
//! and converted into response messages; they never unwind past the
//! command boundary.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reason an order-entry command was rejected.
///
/// `wire_code` values are stable identifiers carried in the reject
/// response message.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    #[error("unknown instrument")]
    UnknownInstrument,

    #[error("quantity must be positive")]
    InvalidQuantity,

    #[error("order not found")]
    OrderNotFound,

    #[error("order belongs to another session")]
    NotOrderOwner,
}

impl RejectReason {
    /// Stable one-byte identifier for the wire protocol.
    pub fn wire_code(&self) -> u8 {
        match self {
            RejectReason::UnknownInstrument => 1,
            RejectReason::InvalidQuantity => 2,
            RejectReason::OrderNotFound => 3,
            RejectReason::NotOrderOwner => 4,
        }
    }

    /// Decode a wire identifier back into a reason.
    pub fn from_wire_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(RejectReason::UnknownInstrument),
            2 => Some(RejectReason::InvalidQuantity),
            3 => Some(RejectReason::OrderNotFound),
            4 => Some(RejectReason::NotOrderOwner),
            _ => None,
        }
    }
}
