//! Market data wire records
//!
//! Two fixed-width record types ride the market-data feed: best bid and
//! offer after a book change, and an anonymous trade tick per matching
//! event. Each record is one feed message; all integers are big-endian.

use types::ids::{Instrument, MatchNumber};
use types::numeric::{Price, Quantity};

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

/// Best bid and offer for one instrument.
///
/// An empty side carries zero price and zero quantity; quantity zero is
/// impossible for a populated side, so it doubles as the absence marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BboRecord {
    pub instrument: Instrument,
    pub bid: Option<(Price, Quantity)>,
    pub ask: Option<(Price, Quantity)>,
}

/// One anonymous trade: quantity and price, no participant identities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TradeTickRecord {
    pub instrument: Instrument,
    pub quantity: Quantity,
    pub price: Price,
    pub match_number: MatchNumber,
}

/// Any record appearing on the market-data feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketDataRecord {
    Bbo(BboRecord),
    TradeTick(TradeTickRecord),
}

impl BboRecord {
    pub const TAG: u8 = b'Q';
    pub const WIRE_LEN: usize = 1 + 4 + 8 + 8 + 8 + 8;

    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(Self::WIRE_LEN);
        buf.push(Self::TAG);
        buf.extend_from_slice(&self.instrument.value().to_be_bytes());
        let (bid_price, bid_quantity) = self.bid.unwrap_or((Price::from_ticks(0), Quantity::zero()));
        let (ask_price, ask_quantity) = self.ask.unwrap_or((Price::from_ticks(0), Quantity::zero()));
        buf.extend_from_slice(&bid_price.ticks().to_be_bytes());
        buf.extend_from_slice(&bid_quantity.units().to_be_bytes());
        buf.extend_from_slice(&ask_price.ticks().to_be_bytes());
        buf.extend_from_slice(&ask_quantity.units().to_be_bytes());
        buf
    }

    fn decode_body(body: &[u8]) -> Result<Self, RecordError> {
        if body.len() < Self::WIRE_LEN - 1 {
            return Err(RecordError::Truncated {
                expected: Self::WIRE_LEN,
                actual: body.len() + 1,
            });
        }
        let instrument = Instrument::new(u32::from_be_bytes(body[0..4].try_into().unwrap()));
        let bid_price = i64::from_be_bytes(body[4..12].try_into().unwrap());
        let bid_quantity = u64::from_be_bytes(body[12..20].try_into().unwrap());
        let ask_price = i64::from_be_bytes(body[20..28].try_into().unwrap());
        let ask_quantity = u64::from_be_bytes(body[28..36].try_into().unwrap());

        let side = |price: i64, quantity: u64| {
            (quantity != 0).then(|| (Price::from_ticks(price), Quantity::new(quantity)))
        };
        Ok(Self {
            instrument,
            bid: side(bid_price, bid_quantity),
            ask: side(ask_price, ask_quantity),
        })
    }
}

impl TradeTickRecord {
    pub const TAG: u8 = b'T';
    pub const WIRE_LEN: usize = 1 + 4 + 8 + 8 + 8;

    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(Self::WIRE_LEN);
        buf.push(Self::TAG);
        buf.extend_from_slice(&self.instrument.value().to_be_bytes());
        buf.extend_from_slice(&self.quantity.units().to_be_bytes());
        buf.extend_from_slice(&self.price.ticks().to_be_bytes());
        buf.extend_from_slice(&self.match_number.value().to_be_bytes());
        buf
    }

    fn decode_body(body: &[u8]) -> Result<Self, RecordError> {
        if body.len() < Self::WIRE_LEN - 1 {
            return Err(RecordError::Truncated {
                expected: Self::WIRE_LEN,
                actual: body.len() + 1,
            });
        }
        Ok(Self {
            instrument: Instrument::new(u32::from_be_bytes(body[0..4].try_into().unwrap())),
            quantity: Quantity::new(u64::from_be_bytes(body[4..12].try_into().unwrap())),
            price: Price::from_ticks(i64::from_be_bytes(body[12..20].try_into().unwrap())),
            match_number: MatchNumber::new(u64::from_be_bytes(body[20..28].try_into().unwrap())),
        })
    }
}

impl MarketDataRecord {
    /// Decode one feed message into a record.
    pub fn decode(buf: &[u8]) -> Result<Self, RecordError> {
        let (&tag, body) = buf.split_first().ok_or(RecordError::Empty)?;
        match tag {
            BboRecord::TAG => Ok(Self::Bbo(BboRecord::decode_body(body)?)),
            TradeTickRecord::TAG => Ok(Self::TradeTick(TradeTickRecord::decode_body(body)?)),
            other => Err(RecordError::UnknownTag(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbo_round_trip() {
        let record = BboRecord {
            instrument: Instrument::new(7),
            bid: Some((Price::from_ticks(100), Quantity::new(25))),
            ask: Some((Price::from_ticks(101), Quantity::new(10))),
        };
        let encoded = record.encode();
        assert_eq!(encoded.len(), BboRecord::WIRE_LEN);
        assert_eq!(encoded[0], b'Q');
        assert_eq!(
            MarketDataRecord::decode(&encoded).unwrap(),
            MarketDataRecord::Bbo(record)
        );
    }

    #[test]
    fn test_bbo_empty_sides() {
        let record = BboRecord {
            instrument: Instrument::new(7),
            bid: None,
            ask: None,
        };
        let decoded = MarketDataRecord::decode(&record.encode()).unwrap();
        assert_eq!(decoded, MarketDataRecord::Bbo(record));
    }

    #[test]
    fn test_trade_tick_round_trip() {
        let record = TradeTickRecord {
            instrument: Instrument::new(3),
            quantity: Quantity::new(10),
            price: Price::from_ticks(-5),
            match_number: MatchNumber::new(42),
        };
        let encoded = record.encode();
        assert_eq!(encoded[0], b'T');
        assert_eq!(
            MarketDataRecord::decode(&encoded).unwrap(),
            MarketDataRecord::TradeTick(record)
        );
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert_eq!(MarketDataRecord::decode(&[]), Err(RecordError::Empty));
        assert_eq!(
            MarketDataRecord::decode(&[b'Z', 0, 0]),
            Err(RecordError::UnknownTag(b'Z'))
        );
        assert!(matches!(
            MarketDataRecord::decode(&[b'Q', 0, 0]),
            Err(RecordError::Truncated { .. })
        ));
    }
}
