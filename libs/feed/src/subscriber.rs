//! Feed subscription with gap detection and recovery
//!
//! `GapTracker` is the pure sequencing state machine: in-order messages
//! are delivered, ahead-of-sequence packets are parked, duplicates are
//! dropped, and a detected gap produces a unicast recovery request for
//! exactly the missing range. `FeedSubscriber` wraps it around the
//! multicast and recovery sockets.

use std::collections::BTreeMap;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

use tokio::net::UdpSocket;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::message::{Packet, PacketBody, RecoveryRequest, SessionName};
use crate::FeedError;

/// One in-order message handed to the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub sequence: u64,
    pub payload: Vec<u8>,
}

/// A missing sequence range to request from the publisher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecoveryRange {
    pub from_sequence: u64,
    pub count: u16,
}

/// Result of feeding one packet to the tracker.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Advance {
    /// Messages now deliverable in sequence order.
    pub deliveries: Vec<Delivery>,
    /// Range to request if a gap was detected.
    pub recovery: Option<RecoveryRange>,
}

/// Subscriber-side sequence tracking.
#[derive(Debug)]
pub struct GapTracker {
    /// Next sequence number to deliver.
    next_expected: u64,
    /// Packets received ahead of sequence, keyed by first sequence.
    parked: BTreeMap<u64, Vec<Vec<u8>>>,
    /// Recovery range already requested and not yet filled.
    outstanding: Option<RecoveryRange>,
    /// Set once the publisher reported the needed range evicted.
    needs_resync: bool,
}

impl GapTracker {
    /// Track a stream whose first expected sequence is `base_sequence`.
    pub fn new(base_sequence: u64) -> Self {
        Self {
            next_expected: base_sequence,
            parked: BTreeMap::new(),
            outstanding: None,
            needs_resync: false,
        }
    }

    /// Next sequence number the tracker will deliver.
    pub fn next_expected(&self) -> u64 {
        self.next_expected
    }

    /// True when gap recovery failed and only a full-state
    /// resynchronization can continue the stream.
    pub fn needs_resync(&self) -> bool {
        self.needs_resync
    }

    /// Process a packet carrying messages starting at `sequence`.
    pub fn on_messages(&mut self, sequence: u64, messages: Vec<Vec<u8>>) -> Advance {
        let mut advance = Advance::default();
        if messages.is_empty() {
            return advance;
        }

        let end = sequence + messages.len() as u64;
        if end <= self.next_expected {
            // Entirely behind: duplicate of already-delivered data.
            return advance;
        }

        if sequence > self.next_expected {
            // Ahead of sequence: park and request the missing range.
            self.parked.entry(sequence).or_insert(messages);
            let first_parked = *self.parked.keys().next().unwrap();
            advance.recovery = self.request_missing(first_parked);
            return advance;
        }

        self.deliver(sequence, &messages, &mut advance.deliveries);
        self.drain_parked(&mut advance.deliveries);

        if let Some(outstanding) = self.outstanding {
            if self.next_expected >= outstanding.from_sequence + outstanding.count as u64 {
                self.outstanding = None;
            }
        }

        // A parked packet may still be ahead if recovery only partially
        // filled the gap; ask for the remainder.
        if advance.recovery.is_none() {
            if let Some((&first_parked, _)) = self.parked.iter().next() {
                advance.recovery = self.request_missing(first_parked);
            }
        }

        advance
    }

    /// Process a heartbeat announcing the publisher's next sequence.
    pub fn on_heartbeat(&mut self, next_sequence: u64) -> Option<RecoveryRange> {
        if next_sequence > self.next_expected {
            self.request_missing(next_sequence)
        } else {
            None
        }
    }

    /// Process a "range unavailable" recovery reply.
    pub fn on_unavailable(&mut self) {
        self.needs_resync = true;
        self.outstanding = None;
    }

    /// Jump to `sequence` after an out-of-band full-state
    /// resynchronization.
    pub fn reset(&mut self, sequence: u64) {
        self.next_expected = sequence;
        self.parked = self.parked.split_off(&sequence);
        self.outstanding = None;
        self.needs_resync = false;
    }

    fn deliver(&mut self, sequence: u64, messages: &[Vec<u8>], out: &mut Vec<Delivery>) {
        for (i, payload) in messages.iter().enumerate() {
            let message_sequence = sequence + i as u64;
            if message_sequence >= self.next_expected {
                out.push(Delivery {
                    sequence: message_sequence,
                    payload: payload.clone(),
                });
                self.next_expected = message_sequence + 1;
            }
        }
    }

    fn drain_parked(&mut self, out: &mut Vec<Delivery>) {
        while let Some((&sequence, messages)) = self.parked.iter().next() {
            let end = sequence + messages.len() as u64;
            if sequence > self.next_expected {
                break;
            }
            let messages = self.parked.remove(&sequence).unwrap();
            if end > self.next_expected {
                self.deliver(sequence, &messages, out);
            }
        }
    }

    /// Request the range [next_expected, up_to) unless an equivalent
    /// request is already outstanding. The range is clamped to the first
    /// parked packet, which already covers everything past it.
    fn request_missing(&mut self, up_to: u64) -> Option<RecoveryRange> {
        let up_to = match self.parked.keys().next() {
            Some(&first_parked) => up_to.min(first_parked),
            None => up_to,
        };
        let missing = up_to.saturating_sub(self.next_expected);
        if missing == 0 {
            return None;
        }
        let range = RecoveryRange {
            from_sequence: self.next_expected,
            count: missing.min(u64::from(u16::MAX - 1)) as u16,
        };
        if self.outstanding == Some(range) {
            return None;
        }
        self.outstanding = Some(range);
        Some(range)
    }
}

/// Asynchronous feed subscriber joined to a multicast group.
pub struct FeedSubscriber {
    session: SessionName,
    multicast_socket: UdpSocket,
    recovery_socket: UdpSocket,
    request_addr: SocketAddr,
    tracker: GapTracker,
}

impl FeedSubscriber {
    /// Join `group` and prepare a unicast socket for gap-fill requests
    /// to `request_addr`.
    pub async fn join(
        session: SessionName,
        group: SocketAddrV4,
        request_addr: SocketAddr,
        base_sequence: u64,
    ) -> Result<Self, FeedError> {
        let multicast_socket =
            UdpSocket::bind(SocketAddr::from((Ipv4Addr::UNSPECIFIED, group.port()))).await?;
        multicast_socket.join_multicast_v4(*group.ip(), Ipv4Addr::UNSPECIFIED)?;

        let recovery_socket = UdpSocket::bind("0.0.0.0:0").await?;

        info!(session = %session, %group, "Joined feed");

        Ok(Self {
            session,
            multicast_socket,
            recovery_socket,
            request_addr,
            tracker: GapTracker::new(base_sequence),
        })
    }

    /// Receive packets and forward in-order deliveries until the
    /// receiver side of `tx` is dropped or the stream needs resync.
    pub async fn run(mut self, tx: mpsc::UnboundedSender<Delivery>) -> Result<(), FeedError> {
        let mut live_buf = vec![0u8; 65536];
        let mut recovery_buf = vec![0u8; 65536];

        loop {
            let (buf, len) = tokio::select! {
                received = self.multicast_socket.recv(&mut live_buf) => {
                    (&live_buf, received?)
                }
                received = self.recovery_socket.recv(&mut recovery_buf) => {
                    (&recovery_buf, received?)
                }
            };

            let packet = match Packet::decode(&buf[..len]) {
                Ok(packet) => packet,
                Err(feed_error) => {
                    warn!(session = %self.session, error = %feed_error, "Dropping malformed packet");
                    continue;
                }
            };

            if packet.session != self.session {
                debug!(session = %self.session, received = %packet.session, "Dropping foreign packet");
                continue;
            }

            let advance = match packet.body {
                PacketBody::Messages(messages) => {
                    self.tracker.on_messages(packet.sequence, messages)
                }
                PacketBody::Heartbeat => Advance {
                    deliveries: Vec::new(),
                    recovery: self.tracker.on_heartbeat(packet.sequence),
                },
                PacketBody::RangeUnavailable => {
                    self.tracker.on_unavailable();
                    error!(
                        session = %self.session,
                        "Recovery range evicted; full resynchronization required"
                    );
                    return Err(FeedError::RangeUnavailable);
                }
            };

            for delivery in advance.deliveries {
                if tx.send(delivery).is_err() {
                    return Ok(());
                }
            }

            if let Some(range) = advance.recovery {
                self.send_recovery_request(range).await;
            }
        }
    }

    async fn send_recovery_request(&self, range: RecoveryRange) {
        let request = RecoveryRequest {
            session: self.session,
            from_sequence: range.from_sequence,
            count: range.count,
        };
        debug!(
            session = %self.session,
            from = range.from_sequence,
            count = range.count,
            "Requesting gap fill"
        );
        if let Err(error) = self
            .recovery_socket
            .send_to(&request.encode(), self.request_addr)
            .await
        {
            warn!(session = %self.session, %error, "Recovery request send failed");
        }
    }
}
