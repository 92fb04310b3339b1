//! Trade report feed server

use feed::{FeedConfig, FeedError, FeedHandle, FeedPublisher};
use tokio::task::JoinHandle;
use tracing::debug;
use types::trade::Trade;

use crate::records::TradeReportRecord;

/// Publishes attributed trade reports onto a sequenced multicast feed.
pub struct TradeReportServer {
    feed: FeedHandle,
}

impl TradeReportServer {
    /// Bind the feed sockets and spawn the publisher task.
    pub async fn start(config: &FeedConfig) -> Result<(Self, JoinHandle<()>), FeedError> {
        let (feed, task) = FeedPublisher::spawn(config).await?;
        Ok((Self { feed }, task))
    }

    /// Wrap an already-running feed.
    pub fn new(feed: FeedHandle) -> Self {
        Self { feed }
    }

    /// Publish one trade. Reports appear on the feed in match-number
    /// order because trades are published in the order they occur.
    pub fn publish_trade(&self, trade: &Trade) -> Result<(), FeedError> {
        let record = TradeReportRecord::from_trade(trade);
        debug!(match_number = %trade.match_number, "Publishing trade report");
        self.feed.publish(record.encode())
    }
}
