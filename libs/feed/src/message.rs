//! Wire format for sequenced feed packets
//!
//! A downstream packet is a sequenced container of zero or more message
//! payloads. All integers are big-endian. Layout:
//!
//! - 8 bytes: session name (ASCII, space padded)
//! - 8 bytes: sequence number of the first message in the packet
//! - 2 bytes: message count
//! - per message: 2-byte length followed by the payload
//!
//! A count of zero marks a heartbeat, in which case the sequence field
//! carries the *next* sequence the publisher will assign. The sentinel
//! count `0xFFFF` is a reply to a recovery request whose range is no
//! longer retained.

use crate::FeedError;
use std::fmt;

/// Message count marking a heartbeat packet.
pub const COUNT_HEARTBEAT: u16 = 0;

/// Message count marking a "range unavailable" recovery reply.
pub const COUNT_UNAVAILABLE: u16 = 0xFFFF;

/// Maximum messages a single packet may carry.
pub const MAX_MESSAGES_PER_PACKET: usize = (COUNT_UNAVAILABLE - 1) as usize;

pub(crate) const HEADER_LEN: usize = 8 + 8 + 2;

/// Feed session name: up to eight ASCII characters, space padded on the
/// wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionName([u8; 8]);

impl SessionName {
    /// Create a session name from a printable-ASCII string of at most
    /// eight characters.
    pub fn new(name: &str) -> Result<Self, FeedError> {
        if name.is_empty()
            || name.len() > 8
            || !name.bytes().all(|b| b.is_ascii_graphic())
        {
            return Err(FeedError::InvalidSessionName(name.to_string()));
        }
        let mut bytes = [b' '; 8];
        bytes[..name.len()].copy_from_slice(name.as_bytes());
        Ok(Self(bytes))
    }

    pub fn from_wire(bytes: [u8; 8]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 8] {
        &self.0
    }
}

impl fmt::Display for SessionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let trimmed = self.0.iter().take_while(|b| **b != b' ').count();
        write!(f, "{}", String::from_utf8_lossy(&self.0[..trimmed]))
    }
}

/// Packet body variants distinguished by the count field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PacketBody {
    /// One or more sequenced message payloads.
    Messages(Vec<Vec<u8>>),
    /// Idle keep-alive; the header sequence is the next to be assigned.
    Heartbeat,
    /// The requested recovery range has been evicted.
    RangeUnavailable,
}

/// A downstream feed packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    pub session: SessionName,
    pub sequence: u64,
    pub body: PacketBody,
}

impl Packet {
    pub fn messages(session: SessionName, sequence: u64, messages: Vec<Vec<u8>>) -> Self {
        Self {
            session,
            sequence,
            body: PacketBody::Messages(messages),
        }
    }

    pub fn heartbeat(session: SessionName, next_sequence: u64) -> Self {
        Self {
            session,
            sequence: next_sequence,
            body: PacketBody::Heartbeat,
        }
    }

    pub fn range_unavailable(session: SessionName, from_sequence: u64) -> Self {
        Self {
            session,
            sequence: from_sequence,
            body: PacketBody::RangeUnavailable,
        }
    }

    /// Serialize to wire bytes.
    pub fn encode(&self) -> Vec<u8> {
        let (count, messages): (u16, &[Vec<u8>]) = match &self.body {
            PacketBody::Messages(messages) => {
                debug_assert!(!messages.is_empty());
                debug_assert!(messages.len() <= MAX_MESSAGES_PER_PACKET);
                (messages.len() as u16, messages)
            }
            PacketBody::Heartbeat => (COUNT_HEARTBEAT, &[]),
            PacketBody::RangeUnavailable => (COUNT_UNAVAILABLE, &[]),
        };

        let body_len: usize = messages.iter().map(|m| 2 + m.len()).sum();
        let mut buf = Vec::with_capacity(HEADER_LEN + body_len);
        buf.extend_from_slice(self.session.as_bytes());
        buf.extend_from_slice(&self.sequence.to_be_bytes());
        buf.extend_from_slice(&count.to_be_bytes());
        for message in messages {
            buf.extend_from_slice(&(message.len() as u16).to_be_bytes());
            buf.extend_from_slice(message);
        }
        buf
    }

    /// Parse a packet from wire bytes.
    pub fn decode(buf: &[u8]) -> Result<Self, FeedError> {
        if buf.len() < HEADER_LEN {
            return Err(FeedError::TruncatedPacket(buf.len()));
        }

        let mut session = [0u8; 8];
        session.copy_from_slice(&buf[0..8]);
        let session = SessionName::from_wire(session);
        let sequence = u64::from_be_bytes(buf[8..16].try_into().unwrap());
        let count = u16::from_be_bytes(buf[16..18].try_into().unwrap());

        let body = match count {
            COUNT_HEARTBEAT => PacketBody::Heartbeat,
            COUNT_UNAVAILABLE => PacketBody::RangeUnavailable,
            _ => {
                let mut messages = Vec::with_capacity(count as usize);
                let mut offset = HEADER_LEN;
                for _ in 0..count {
                    if buf.len() < offset + 2 {
                        return Err(FeedError::TruncatedPacket(buf.len()));
                    }
                    let len =
                        u16::from_be_bytes(buf[offset..offset + 2].try_into().unwrap()) as usize;
                    offset += 2;
                    if buf.len() < offset + len {
                        return Err(FeedError::TruncatedPacket(buf.len()));
                    }
                    messages.push(buf[offset..offset + len].to_vec());
                    offset += len;
                }
                PacketBody::Messages(messages)
            }
        };

        Ok(Self {
            session,
            sequence,
            body,
        })
    }
}

/// A unicast gap-fill request: replay `count` messages starting at
/// `from_sequence`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecoveryRequest {
    pub session: SessionName,
    pub from_sequence: u64,
    pub count: u16,
}

impl RecoveryRequest {
    pub const WIRE_LEN: usize = HEADER_LEN;

    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(Self::WIRE_LEN);
        buf.extend_from_slice(self.session.as_bytes());
        buf.extend_from_slice(&self.from_sequence.to_be_bytes());
        buf.extend_from_slice(&self.count.to_be_bytes());
        buf
    }

    pub fn decode(buf: &[u8]) -> Result<Self, FeedError> {
        if buf.len() < Self::WIRE_LEN {
            return Err(FeedError::TruncatedPacket(buf.len()));
        }
        let mut session = [0u8; 8];
        session.copy_from_slice(&buf[0..8]);
        Ok(Self {
            session: SessionName::from_wire(session),
            from_sequence: u64::from_be_bytes(buf[8..16].try_into().unwrap()),
            count: u16::from_be_bytes(buf[16..18].try_into().unwrap()),
        })
    }
}
