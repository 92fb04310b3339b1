//! Trade report wire record
//!
//! The attributed counterpart of the public trade tick: one record per
//! matching event carrying both sessions and both order numbers, for
//! clearing and surveillance consumers. Fixed width, big-endian.

use types::ids::{Instrument, MatchNumber, OrderNumber, SessionId};
use types::numeric::{Price, Quantity};
use types::trade::Trade;

/// Record decoding failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    #[error("record is empty")]
    Empty,
    #[error("unknown record tag {0:#04x}")]
    UnknownTag(u8),
    #[error("record truncated: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },
}

/// One fully attributed trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TradeReportRecord {
    pub timestamp_nanos: u64,
    pub match_number: MatchNumber,
    pub instrument: Instrument,
    pub quantity: Quantity,
    pub price: Price,
    pub buyer: SessionId,
    pub buy_order_number: OrderNumber,
    pub seller: SessionId,
    pub sell_order_number: OrderNumber,
}

impl TradeReportRecord {
    pub const TAG: u8 = b'R';
    pub const WIRE_LEN: usize = 1 + 8 + 8 + 4 + 8 + 8 + 8 + 8 + 8 + 8;

    pub fn from_trade(trade: &Trade) -> Self {
        Self {
            timestamp_nanos: trade.timestamp_nanos,
            match_number: trade.match_number,
            instrument: trade.instrument,
            quantity: trade.quantity,
            price: trade.price,
            buyer: trade.buyer,
            buy_order_number: trade.buy_order_number,
            seller: trade.seller,
            sell_order_number: trade.sell_order_number,
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(Self::WIRE_LEN);
        buf.push(Self::TAG);
        buf.extend_from_slice(&self.timestamp_nanos.to_be_bytes());
        buf.extend_from_slice(&self.match_number.value().to_be_bytes());
        buf.extend_from_slice(&self.instrument.value().to_be_bytes());
        buf.extend_from_slice(&self.quantity.units().to_be_bytes());
        buf.extend_from_slice(&self.price.ticks().to_be_bytes());
        buf.extend_from_slice(&self.buyer.value().to_be_bytes());
        buf.extend_from_slice(&self.buy_order_number.value().to_be_bytes());
        buf.extend_from_slice(&self.seller.value().to_be_bytes());
        buf.extend_from_slice(&self.sell_order_number.value().to_be_bytes());
        buf
    }

    pub fn decode(buf: &[u8]) -> Result<Self, RecordError> {
        let (&tag, body) = buf.split_first().ok_or(RecordError::Empty)?;
        if tag != Self::TAG {
            return Err(RecordError::UnknownTag(tag));
        }
        if body.len() < Self::WIRE_LEN - 1 {
            return Err(RecordError::Truncated {
                expected: Self::WIRE_LEN,
                actual: buf.len(),
            });
        }
        Ok(Self {
            timestamp_nanos: u64::from_be_bytes(body[0..8].try_into().unwrap()),
            match_number: MatchNumber::new(u64::from_be_bytes(body[8..16].try_into().unwrap())),
            instrument: Instrument::new(u32::from_be_bytes(body[16..20].try_into().unwrap())),
            quantity: Quantity::new(u64::from_be_bytes(body[20..28].try_into().unwrap())),
            price: Price::from_ticks(i64::from_be_bytes(body[28..36].try_into().unwrap())),
            buyer: SessionId::new(u64::from_be_bytes(body[36..44].try_into().unwrap())),
            buy_order_number: OrderNumber::new(u64::from_be_bytes(body[44..52].try_into().unwrap())),
            seller: SessionId::new(u64::from_be_bytes(body[52..60].try_into().unwrap())),
            sell_order_number: OrderNumber::new(u64::from_be_bytes(
                body[60..68].try_into().unwrap(),
            )),
        })
    }
}
