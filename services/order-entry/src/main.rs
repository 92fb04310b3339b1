use market_data::MarketDataServer;
use order_entry::config::Config;
use order_entry::dispatch::Dispatcher;
use order_entry::server;
use tokio::net::TcpListener;
use trade_reports::TradeReportServer;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt::init();

    let config = match std::env::args().nth(1) {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    tracing::info!(
        listen = %config.listen_addr,
        instruments = config.instruments.len(),
        "Starting order entry venue"
    );

    let (market_data, _market_data_task) =
        MarketDataServer::start(&config.market_data.to_feed_config()?).await?;
    let (trade_reports, _trade_reports_task) =
        TradeReportServer::start(&config.trade_reports.to_feed_config()?).await?;

    let dispatcher = Dispatcher::new(config.instruments(), market_data, trade_reports);
    let (engine, _engine_task) = dispatcher.spawn();

    let listener = TcpListener::bind(config.listen_addr).await?;
    server::run(listener, engine).await?;

    Ok(())
}
