//! Sequencing multicast publisher
//!
//! One task owns the multicast socket, the retention log, and the unicast
//! request socket, and services publishes, heartbeats, and gap-fill
//! requests from a single select loop. Publishes are always serviceable,
//! so the hot path never waits on recovery I/O.

use std::net::{SocketAddr, SocketAddrV4};
use std::time::Duration;

use tokio::net::UdpSocket;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::message::{Packet, RecoveryRequest, SessionName, HEADER_LEN, MAX_MESSAGES_PER_PACKET};
use crate::retention::{RangeError, RetentionLog};
use crate::FeedError;

/// Datagram budget for one recovery reply packet; larger ranges are
/// served as multiple packets.
const MAX_REPLY_BYTES: usize = 1400;

/// Configuration for one feed stream.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Stream name carried in every packet header.
    pub session: SessionName,
    /// Multicast group and port for downstream packets.
    pub group: SocketAddrV4,
    /// Local bind address of the unicast gap-fill request socket.
    pub request_bind: SocketAddr,
    /// Multicast TTL.
    pub ttl: u32,
    /// Whether multicast loopback is enabled (useful for local runs).
    pub loopback: bool,
    /// Heartbeat is emitted after this much idle time.
    pub heartbeat_interval: Duration,
    /// Retained message count for replay.
    pub retention_capacity: usize,
    /// Sequence number assigned to the first published message.
    pub base_sequence: u64,
}

/// Handle for publishing payloads onto a running feed.
#[derive(Debug, Clone)]
pub struct FeedHandle {
    tx: mpsc::UnboundedSender<Vec<u8>>,
}

impl FeedHandle {
    /// Queue a payload for sequencing and multicast.
    pub fn publish(&self, payload: Vec<u8>) -> Result<(), FeedError> {
        self.tx
            .send(payload)
            .map_err(|_| FeedError::StreamClosed)
    }
}

/// The publisher task state.
pub struct FeedPublisher {
    session: SessionName,
    socket: UdpSocket,
    group: SocketAddr,
    request_socket: UdpSocket,
    retention: RetentionLog,
    heartbeat_interval: Duration,
}

impl FeedPublisher {
    /// Bind the multicast send socket and the unicast request socket.
    pub async fn bind(config: &FeedConfig) -> Result<Self, FeedError> {
        let socket = UdpSocket::bind("0.0.0.0:0").await?;
        socket.set_multicast_ttl_v4(config.ttl)?;
        socket.set_multicast_loop_v4(config.loopback)?;

        let request_socket = UdpSocket::bind(config.request_bind).await?;

        info!(
            session = %config.session,
            group = %config.group,
            request = %request_socket.local_addr()?,
            "Feed publisher bound"
        );

        Ok(Self {
            session: config.session,
            socket,
            group: SocketAddr::V4(config.group),
            request_socket,
            retention: RetentionLog::new(config.base_sequence, config.retention_capacity),
            heartbeat_interval: config.heartbeat_interval,
        })
    }

    /// Local address of the unicast gap-fill request socket.
    pub fn request_addr(&self) -> Result<SocketAddr, FeedError> {
        Ok(self.request_socket.local_addr()?)
    }

    /// Spawn the task for an already-bound publisher.
    pub fn start(self) -> (FeedHandle, tokio::task::JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(self.run(rx));
        (FeedHandle { tx }, task)
    }

    /// Bind and spawn the publisher task, returning a publish handle.
    pub async fn spawn(
        config: &FeedConfig,
    ) -> Result<(FeedHandle, tokio::task::JoinHandle<()>), FeedError> {
        let publisher = Self::bind(config).await?;
        Ok(publisher.start())
    }

    /// Service publishes, gap-fill requests, and heartbeats until every
    /// publish handle is dropped.
    pub async fn run(self, mut rx: mpsc::UnboundedReceiver<Vec<u8>>) {
        let Self {
            session,
            socket,
            group,
            request_socket,
            mut retention,
            heartbeat_interval,
        } = self;

        let mut heartbeat = tokio::time::interval(heartbeat_interval);
        heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut request_buf = [0u8; RecoveryRequest::WIRE_LEN];

        loop {
            tokio::select! {
                biased;

                maybe_payload = rx.recv() => {
                    let Some(payload) = maybe_payload else { break };
                    let sequence = retention.append(payload.clone());
                    let packet = Packet::messages(session, sequence, vec![payload]);
                    if let Err(error) = socket.send_to(&packet.encode(), group).await {
                        warn!(session = %session, sequence, %error, "Multicast send failed");
                    }
                    heartbeat.reset();
                }

                received = request_socket.recv_from(&mut request_buf) => {
                    match received {
                        Ok((len, from)) => {
                            serve_request(
                                &request_socket,
                                session,
                                &retention,
                                &request_buf[..len],
                                from,
                            )
                            .await;
                        }
                        Err(error) => {
                            warn!(session = %session, %error, "Request socket receive failed");
                        }
                    }
                }

                _ = heartbeat.tick() => {
                    let packet = Packet::heartbeat(session, retention.next_sequence());
                    if let Err(error) = socket.send_to(&packet.encode(), group).await {
                        warn!(session = %session, %error, "Heartbeat send failed");
                    }
                }
            }
        }

        info!(session = %session, "Feed publisher stopped");
    }
}

/// Answer one unicast gap-fill request from the retention log.
async fn serve_request(
    request_socket: &UdpSocket,
    session: SessionName,
    retention: &RetentionLog,
    buf: &[u8],
    from: SocketAddr,
) {
    let request = match RecoveryRequest::decode(buf) {
        Ok(request) => request,
        Err(error) => {
            debug!(session = %session, %from, %error, "Ignoring malformed recovery request");
            return;
        }
    };

    if request.session != session {
        debug!(
            session = %session,
            requested = %request.session,
            "Ignoring recovery request for another stream"
        );
        return;
    }

    for reply in replies_for_request(session, retention, &request) {
        if let Err(error) = request_socket.send_to(&reply.encode(), from).await {
            warn!(session = %session, %from, %error, "Recovery reply send failed");
            return;
        }
    }
}

/// Build the reply packets for a recovery request.
///
/// A retained range is served in sequence order, split across packets
/// that fit the reply datagram budget. An evicted range gets the
/// decisive "unavailable" sentinel; an empty request or a range that has
/// not been published yet gets a heartbeat telling the requester where
/// the stream currently is.
fn replies_for_request(
    session: SessionName,
    retention: &RetentionLog,
    request: &RecoveryRequest,
) -> Vec<Packet> {
    if request.count == 0 {
        return vec![Packet::heartbeat(session, retention.next_sequence())];
    }
    match retention.range(request.from_sequence, request.count) {
        Ok(payloads) => {
            debug!(
                session = %session,
                from = request.from_sequence,
                served = payloads.len(),
                "Serving recovery request"
            );
            chunk_into_packets(session, request.from_sequence, payloads)
        }
        Err(RangeError::Evicted { oldest_retained }) => {
            info!(
                session = %session,
                from = request.from_sequence,
                oldest_retained,
                "Recovery range evicted"
            );
            vec![Packet::range_unavailable(session, request.from_sequence)]
        }
        Err(RangeError::NotYetPublished { next_sequence }) => {
            vec![Packet::heartbeat(session, next_sequence)]
        }
    }
}

/// Split a recovered range into packets no larger than `MAX_REPLY_BYTES`
/// (a single oversized message still travels alone). Each message costs
/// at least two budget bytes, so per-packet counts stay far below the
/// `0xFFFF` sentinel; the explicit cap keeps that true for any budget.
fn chunk_into_packets(
    session: SessionName,
    from_sequence: u64,
    payloads: Vec<Vec<u8>>,
) -> Vec<Packet> {
    let mut packets = Vec::new();
    let mut chunk: Vec<Vec<u8>> = Vec::new();
    let mut chunk_start = from_sequence;
    let mut bytes = HEADER_LEN;

    for payload in payloads {
        let cost = 2 + payload.len();
        let full = bytes + cost > MAX_REPLY_BYTES || chunk.len() == MAX_MESSAGES_PER_PACKET;
        if !chunk.is_empty() && full {
            let next_start = chunk_start + chunk.len() as u64;
            packets.push(Packet::messages(session, chunk_start, std::mem::take(&mut chunk)));
            chunk_start = next_start;
            bytes = HEADER_LEN;
        }
        bytes += cost;
        chunk.push(payload);
    }
    if !chunk.is_empty() {
        packets.push(Packet::messages(session, chunk_start, chunk));
    }
    packets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::PacketBody;

    fn test_session() -> SessionName {
        SessionName::new("MD").unwrap()
    }

    fn log_with(base: u64, capacity: usize, count: u64) -> RetentionLog {
        let mut log = RetentionLog::new(base, capacity);
        for i in 0..count {
            log.append(vec![i as u8]);
        }
        log
    }

    fn request(from_sequence: u64, count: u16) -> RecoveryRequest {
        RecoveryRequest {
            session: test_session(),
            from_sequence,
            count,
        }
    }

    #[test]
    fn test_reply_serves_retained_range() {
        let log = log_with(1, 16, 10);

        let replies = replies_for_request(test_session(), &log, &request(5, 3));
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].sequence, 5);
        assert_eq!(
            replies[0].body,
            PacketBody::Messages(vec![vec![4], vec![5], vec![6]])
        );
    }

    #[test]
    fn test_reply_for_evicted_range() {
        let log = log_with(1, 4, 10);

        let replies = replies_for_request(test_session(), &log, &request(2, 3));
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].body, PacketBody::RangeUnavailable);
        assert_eq!(replies[0].sequence, 2);
    }

    #[test]
    fn test_reply_for_future_range_is_heartbeat() {
        let log = log_with(1, 4, 2);

        let replies = replies_for_request(test_session(), &log, &request(9, 1));
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].body, PacketBody::Heartbeat);
        assert_eq!(replies[0].sequence, 3);
    }

    #[test]
    fn test_zero_count_request_gets_heartbeat() {
        // An empty range must never reach the packet encoder; the
        // requester gets the current stream position instead.
        let log = log_with(1, 16, 10);

        let replies = replies_for_request(test_session(), &log, &request(1, 0));
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].body, PacketBody::Heartbeat);
        assert_eq!(replies[0].sequence, 11);
    }

    #[test]
    fn test_large_range_reply_is_chunked() {
        let mut log = RetentionLog::new(1, 128);
        for i in 0..30u8 {
            log.append(vec![i; 100]);
        }

        let replies = replies_for_request(test_session(), &log, &request(1, 30));
        assert!(replies.len() > 1);

        let mut expected_sequence = 1;
        let mut recovered = Vec::new();
        for reply in &replies {
            assert!(reply.encode().len() <= MAX_REPLY_BYTES);
            assert_eq!(reply.sequence, expected_sequence);
            let PacketBody::Messages(messages) = &reply.body else {
                panic!("expected messages, got {:?}", reply.body);
            };
            expected_sequence += messages.len() as u64;
            recovered.extend(messages.iter().cloned());
        }
        assert_eq!(recovered.len(), 30);
        assert_eq!(recovered[0], vec![0; 100]);
        assert_eq!(recovered[29], vec![29; 100]);
    }

    #[test]
    fn test_sentinel_count_request_served_as_messages() {
        // A request for 0xFFFF messages must never produce a reply whose
        // count field collides with the "unavailable" sentinel.
        let log = log_with(1, 16, 10);

        let replies = replies_for_request(test_session(), &log, &request(1, u16::MAX));
        let mut served = 0;
        for reply in &replies {
            let PacketBody::Messages(messages) = &reply.body else {
                panic!("expected messages, got {:?}", reply.body);
            };
            assert!(messages.len() < crate::message::COUNT_UNAVAILABLE as usize);
            served += messages.len();
        }
        assert_eq!(served, 10);
    }

    #[tokio::test]
    async fn test_publish_assigns_sequence_and_retains() {
        let config = FeedConfig {
            session: test_session(),
            group: "239.255.0.1:0".parse().unwrap(),
            request_bind: "127.0.0.1:0".parse().unwrap(),
            ttl: 1,
            loopback: true,
            heartbeat_interval: Duration::from_secs(60),
            retention_capacity: 8,
            base_sequence: 1,
        };

        let mut publisher = FeedPublisher::bind(&config).await.unwrap();
        let first = publisher.retention.append(vec![1]);
        let second = publisher.retention.append(vec![2]);
        assert_eq!((first, second), (1, 2));
        assert_eq!(publisher.retention.next_sequence(), 3);
    }
}
