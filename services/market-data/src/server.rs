//! Market data feed server
//!
//! Thin producer over a sequenced feed stream: encodes book updates and
//! trade ticks as records and hands them to the publisher task, which
//! assigns sequence numbers in publish order.

use feed::{FeedConfig, FeedError, FeedHandle, FeedPublisher};
use tokio::task::JoinHandle;
use tracing::debug;
use types::ids::Instrument;
use types::numeric::{Price, Quantity};
use types::trade::Trade;

use crate::records::{BboRecord, TradeTickRecord};

/// Publishes market data records onto a sequenced multicast feed.
pub struct MarketDataServer {
    feed: FeedHandle,
}

impl MarketDataServer {
    /// Bind the feed sockets and spawn the publisher task.
    pub async fn start(config: &FeedConfig) -> Result<(Self, JoinHandle<()>), FeedError> {
        let (feed, task) = FeedPublisher::spawn(config).await?;
        Ok((Self { feed }, task))
    }

    /// Wrap an already-running feed.
    pub fn new(feed: FeedHandle) -> Self {
        Self { feed }
    }

    /// Publish the best bid and offer after a book change.
    pub fn publish_top_of_book(
        &self,
        instrument: Instrument,
        bid: Option<(Price, Quantity)>,
        ask: Option<(Price, Quantity)>,
    ) -> Result<(), FeedError> {
        let record = BboRecord {
            instrument,
            bid,
            ask,
        };
        debug!(instrument = %instrument, "Publishing top of book");
        self.feed.publish(record.encode())
    }

    /// Publish the anonymous tick for one matching event.
    ///
    /// Only quantity, price, and the match number leave the venue; the
    /// participant fields of the trade stay private.
    pub fn publish_trade_tick(&self, trade: &Trade) -> Result<(), FeedError> {
        let record = TradeTickRecord {
            instrument: trade.instrument,
            quantity: trade.quantity,
            price: trade.price,
            match_number: trade.match_number,
        };
        debug!(
            instrument = %trade.instrument,
            match_number = %trade.match_number,
            "Publishing trade tick"
        );
        self.feed.publish(record.encode())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feed::SessionName;
    use std::time::Duration;
    use types::ids::{MatchNumber, OrderNumber, SessionId};

    fn local_config() -> FeedConfig {
        FeedConfig {
            session: SessionName::new("MD").unwrap(),
            group: "239.255.0.1:0".parse().unwrap(),
            request_bind: "127.0.0.1:0".parse().unwrap(),
            ttl: 1,
            loopback: true,
            heartbeat_interval: Duration::from_secs(60),
            retention_capacity: 64,
            base_sequence: 1,
        }
    }

    #[tokio::test]
    async fn test_publishes_records_onto_feed() {
        let (server, task) = MarketDataServer::start(&local_config()).await.unwrap();

        server
            .publish_top_of_book(
                Instrument::new(1),
                Some((Price::from_ticks(100), Quantity::new(10))),
                None,
            )
            .unwrap();

        let trade = Trade::new(
            MatchNumber::new(1),
            Instrument::new(1),
            Quantity::new(10),
            Price::from_ticks(100),
            SessionId::new(1),
            OrderNumber::new(1),
            SessionId::new(2),
            OrderNumber::new(2),
            1708123456789000000,
        );
        server.publish_trade_tick(&trade).unwrap();

        drop(server);
        task.await.unwrap();
    }
}
