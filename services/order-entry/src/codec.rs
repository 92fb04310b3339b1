//! Order-entry wire protocol
//!
//! Frames are a `u16` big-endian length prefix followed by a one-byte
//! command tag and a fixed-width big-endian body. Clients stamp each
//! command with a correlation token that is echoed on the response;
//! executions are unsolicited and carry no token.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use types::errors::RejectReason;
use types::ids::{Instrument, MatchNumber, OrderNumber};
use types::numeric::{Price, Quantity};
use types::order::Side;

/// Upper bound on a frame body; anything larger is a protocol error.
pub const MAX_FRAME_LEN: usize = 256;

/// Framing or field decoding failure. Any of these closes the session.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("empty frame")]
    Empty,
    #[error("frame length {0} exceeds maximum")]
    Oversized(usize),
    #[error("unknown message tag {0:#04x}")]
    UnknownTag(u8),
    #[error("message truncated: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },
    #[error("invalid side byte {0:#04x}")]
    InvalidSide(u8),
    #[error("unknown reject reason code {0}")]
    UnknownReason(u8),
}

/// A command from client to venue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboundMessage {
    Enter {
        token: u64,
        instrument: Instrument,
        side: Side,
        price: Price,
        quantity: Quantity,
    },
    Cancel {
        token: u64,
        order_number: OrderNumber,
    },
    Replace {
        token: u64,
        order_number: OrderNumber,
        quantity: Quantity,
        price: Price,
    },
}

/// A response or execution from venue to client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutboundMessage {
    Accepted {
        token: u64,
        order_number: OrderNumber,
    },
    Rejected {
        token: u64,
        reason: RejectReason,
    },
    Canceled {
        token: u64,
        order_number: OrderNumber,
    },
    Replaced {
        token: u64,
        order_number: OrderNumber,
    },
    Executed {
        order_number: OrderNumber,
        quantity: Quantity,
        price: Price,
        match_number: MatchNumber,
    },
}

const TAG_ENTER: u8 = b'E';
const TAG_CANCEL: u8 = b'X';
const TAG_REPLACE: u8 = b'U';
const TAG_ACCEPTED: u8 = b'A';
const TAG_REJECTED: u8 = b'J';
const TAG_CANCELED: u8 = b'C';
const TAG_REPLACED: u8 = b'R';
const TAG_EXECUTED: u8 = b'F';

const SIDE_BUY: u8 = b'B';
const SIDE_SELL: u8 = b'S';

fn require(body: &[u8], expected: usize) -> Result<(), CodecError> {
    if body.len() < expected {
        return Err(CodecError::Truncated {
            expected: expected + 1,
            actual: body.len() + 1,
        });
    }
    Ok(())
}

fn read_u64(body: &[u8], at: usize) -> u64 {
    u64::from_be_bytes(body[at..at + 8].try_into().unwrap())
}

fn read_i64(body: &[u8], at: usize) -> i64 {
    i64::from_be_bytes(body[at..at + 8].try_into().unwrap())
}

fn read_u32(body: &[u8], at: usize) -> u32 {
    u32::from_be_bytes(body[at..at + 4].try_into().unwrap())
}

impl InboundMessage {
    pub fn decode(payload: &[u8]) -> Result<Self, CodecError> {
        let (&tag, body) = payload.split_first().ok_or(CodecError::Empty)?;
        match tag {
            TAG_ENTER => {
                require(body, 8 + 4 + 1 + 8 + 8)?;
                let side = match body[12] {
                    SIDE_BUY => Side::Buy,
                    SIDE_SELL => Side::Sell,
                    other => return Err(CodecError::InvalidSide(other)),
                };
                Ok(Self::Enter {
                    token: read_u64(body, 0),
                    instrument: Instrument::new(read_u32(body, 8)),
                    side,
                    price: Price::from_ticks(read_i64(body, 13)),
                    quantity: Quantity::new(read_u64(body, 21)),
                })
            }
            TAG_CANCEL => {
                require(body, 8 + 8)?;
                Ok(Self::Cancel {
                    token: read_u64(body, 0),
                    order_number: OrderNumber::new(read_u64(body, 8)),
                })
            }
            TAG_REPLACE => {
                require(body, 8 + 8 + 8 + 8)?;
                Ok(Self::Replace {
                    token: read_u64(body, 0),
                    order_number: OrderNumber::new(read_u64(body, 8)),
                    quantity: Quantity::new(read_u64(body, 16)),
                    price: Price::from_ticks(read_i64(body, 24)),
                })
            }
            other => Err(CodecError::UnknownTag(other)),
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(40);
        match self {
            Self::Enter {
                token,
                instrument,
                side,
                price,
                quantity,
            } => {
                buf.push(TAG_ENTER);
                buf.extend_from_slice(&token.to_be_bytes());
                buf.extend_from_slice(&instrument.value().to_be_bytes());
                buf.push(match side {
                    Side::Buy => SIDE_BUY,
                    Side::Sell => SIDE_SELL,
                });
                buf.extend_from_slice(&price.ticks().to_be_bytes());
                buf.extend_from_slice(&quantity.units().to_be_bytes());
            }
            Self::Cancel {
                token,
                order_number,
            } => {
                buf.push(TAG_CANCEL);
                buf.extend_from_slice(&token.to_be_bytes());
                buf.extend_from_slice(&order_number.value().to_be_bytes());
            }
            Self::Replace {
                token,
                order_number,
                quantity,
                price,
            } => {
                buf.push(TAG_REPLACE);
                buf.extend_from_slice(&token.to_be_bytes());
                buf.extend_from_slice(&order_number.value().to_be_bytes());
                buf.extend_from_slice(&quantity.units().to_be_bytes());
                buf.extend_from_slice(&price.ticks().to_be_bytes());
            }
        }
        buf
    }
}

impl OutboundMessage {
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(40);
        match self {
            Self::Accepted {
                token,
                order_number,
            } => {
                buf.push(TAG_ACCEPTED);
                buf.extend_from_slice(&token.to_be_bytes());
                buf.extend_from_slice(&order_number.value().to_be_bytes());
            }
            Self::Rejected { token, reason } => {
                buf.push(TAG_REJECTED);
                buf.extend_from_slice(&token.to_be_bytes());
                buf.push(reason.wire_code());
            }
            Self::Canceled {
                token,
                order_number,
            } => {
                buf.push(TAG_CANCELED);
                buf.extend_from_slice(&token.to_be_bytes());
                buf.extend_from_slice(&order_number.value().to_be_bytes());
            }
            Self::Replaced {
                token,
                order_number,
            } => {
                buf.push(TAG_REPLACED);
                buf.extend_from_slice(&token.to_be_bytes());
                buf.extend_from_slice(&order_number.value().to_be_bytes());
            }
            Self::Executed {
                order_number,
                quantity,
                price,
                match_number,
            } => {
                buf.push(TAG_EXECUTED);
                buf.extend_from_slice(&order_number.value().to_be_bytes());
                buf.extend_from_slice(&quantity.units().to_be_bytes());
                buf.extend_from_slice(&price.ticks().to_be_bytes());
                buf.extend_from_slice(&match_number.value().to_be_bytes());
            }
        }
        buf
    }

    pub fn decode(payload: &[u8]) -> Result<Self, CodecError> {
        let (&tag, body) = payload.split_first().ok_or(CodecError::Empty)?;
        match tag {
            TAG_ACCEPTED => {
                require(body, 16)?;
                Ok(Self::Accepted {
                    token: read_u64(body, 0),
                    order_number: OrderNumber::new(read_u64(body, 8)),
                })
            }
            TAG_REJECTED => {
                require(body, 9)?;
                let reason = RejectReason::from_wire_code(body[8])
                    .ok_or(CodecError::UnknownReason(body[8]))?;
                Ok(Self::Rejected {
                    token: read_u64(body, 0),
                    reason,
                })
            }
            TAG_CANCELED => {
                require(body, 16)?;
                Ok(Self::Canceled {
                    token: read_u64(body, 0),
                    order_number: OrderNumber::new(read_u64(body, 8)),
                })
            }
            TAG_REPLACED => {
                require(body, 16)?;
                Ok(Self::Replaced {
                    token: read_u64(body, 0),
                    order_number: OrderNumber::new(read_u64(body, 8)),
                })
            }
            TAG_EXECUTED => {
                require(body, 32)?;
                Ok(Self::Executed {
                    order_number: OrderNumber::new(read_u64(body, 0)),
                    quantity: Quantity::new(read_u64(body, 8)),
                    price: Price::from_ticks(read_i64(body, 16)),
                    match_number: MatchNumber::new(read_u64(body, 24)),
                })
            }
            other => Err(CodecError::UnknownTag(other)),
        }
    }
}

/// Read one length-prefixed frame. `Ok(None)` means the peer closed the
/// connection cleanly between frames.
pub async fn read_frame<R: AsyncRead + Unpin>(
    reader: &mut R,
) -> std::io::Result<Option<Vec<u8>>> {
    let mut len_buf = [0u8; 2];
    match reader.read_exact(&mut len_buf).await {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e),
    }
    let len = u16::from_be_bytes(len_buf) as usize;
    if len == 0 {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            CodecError::Empty.to_string(),
        ));
    }
    if len > MAX_FRAME_LEN {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            CodecError::Oversized(len).to_string(),
        ));
    }
    let mut payload = vec![0u8; len];
    reader.read_exact(&mut payload).await?;
    Ok(Some(payload))
}

/// Write one length-prefixed frame.
pub async fn write_frame<W: AsyncWrite + Unpin>(
    writer: &mut W,
    payload: &[u8],
) -> std::io::Result<()> {
    debug_assert!(payload.len() <= MAX_FRAME_LEN);
    writer.write_all(&(payload.len() as u16).to_be_bytes()).await?;
    writer.write_all(payload).await?;
    writer.flush().await
}
