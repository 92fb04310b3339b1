//! TCP order-entry front end
//!
//! One connection per client session. The reader half decodes frames and
//! forwards commands to the engine task; a writer task drains that
//! session's response channel. A malformed frame closes the session
//! without touching the book.

use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use types::ids::SessionId;

use crate::codec::{self, InboundMessage, OutboundMessage};
use crate::dispatch::EngineEvent;
use matching_engine::Command;

/// Accept connections and run one session per connection.
pub async fn run(
    listener: TcpListener,
    engine: mpsc::UnboundedSender<EngineEvent>,
) -> std::io::Result<()> {
    info!(addr = %listener.local_addr()?, "Order entry listening");
    let mut next_session = 1u64;

    loop {
        let (stream, peer) = listener.accept().await?;
        let session = SessionId::new(next_session);
        next_session += 1;
        info!(session = %session, %peer, "Session connected");
        tokio::spawn(run_session(stream, session, engine.clone()));
    }
}

async fn run_session(
    stream: TcpStream,
    session: SessionId,
    engine: mpsc::UnboundedSender<EngineEvent>,
) {
    let (reader, writer) = stream.into_split();

    let (replies_tx, replies_rx) = mpsc::unbounded_channel();
    if engine
        .send(EngineEvent::SessionOpened {
            session,
            replies: replies_tx,
        })
        .is_err()
    {
        warn!(session = %session, "Engine unavailable, dropping connection");
        return;
    }

    let writer_task = tokio::spawn(write_responses(writer, replies_rx, session));

    read_commands(reader, session, &engine).await;

    // Unregistering the session drops its reply sender, which ends the
    // writer task after the queue drains.
    let _ = engine.send(EngineEvent::SessionClosed { session });
    let _ = writer_task.await;
    info!(session = %session, "Session closed");
}

/// Decode inbound frames and forward commands until the peer disconnects
/// or violates the protocol.
async fn read_commands(
    mut reader: OwnedReadHalf,
    session: SessionId,
    engine: &mpsc::UnboundedSender<EngineEvent>,
) {
    let mut inbound_count = 0u64;
    loop {
        let payload = match codec::read_frame(&mut reader).await {
            Ok(Some(payload)) => payload,
            Ok(None) => {
                debug!(session = %session, inbound_count, "Peer disconnected");
                return;
            }
            Err(error) => {
                warn!(session = %session, %error, "Closing session on framing error");
                return;
            }
        };

        let message = match InboundMessage::decode(&payload) {
            Ok(message) => message,
            Err(error) => {
                warn!(session = %session, %error, "Closing session on malformed command");
                return;
            }
        };
        inbound_count += 1;

        let (token, command) = match message {
            InboundMessage::Enter {
                token,
                instrument,
                side,
                price,
                quantity,
            } => (
                token,
                Command::Enter {
                    instrument,
                    side,
                    price,
                    quantity,
                },
            ),
            InboundMessage::Cancel {
                token,
                order_number,
            } => (token, Command::Cancel { order_number }),
            InboundMessage::Replace {
                token,
                order_number,
                quantity,
                price,
            } => (
                token,
                Command::Replace {
                    order_number,
                    quantity,
                    price,
                },
            ),
        };

        if engine
            .send(EngineEvent::Command {
                session,
                token,
                command,
            })
            .is_err()
        {
            warn!(session = %session, "Engine stopped, closing session");
            return;
        }
    }
}

/// Write responses in engine-emission order until the reply channel
/// closes or the socket fails.
async fn write_responses(
    mut writer: OwnedWriteHalf,
    mut replies: mpsc::UnboundedReceiver<OutboundMessage>,
    session: SessionId,
) {
    let mut outbound_count = 0u64;
    while let Some(message) = replies.recv().await {
        if let Err(error) = codec::write_frame(&mut writer, &message.encode()).await {
            warn!(session = %session, %error, "Response write failed");
            return;
        }
        outbound_count += 1;
    }
    debug!(session = %session, outbound_count, "Response stream drained");
}
