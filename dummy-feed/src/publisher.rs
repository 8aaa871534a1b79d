use log::info;
use std::time::Duration;
use trading::traits::data_feed::PriceSource;
use trading::PriceTick;
use trading_core::comms::{ChannelError, SenderSocket};

/// Broadcasts a continuous sequence of ticks for a single symbol.
pub struct SymbolPublisher<S> {
    symbol: String,
    source: S,
    sender: SenderSocket<PriceTick>,
    interval: Duration,
}

impl<S: PriceSource> SymbolPublisher<S> {
    pub fn new(
        symbol: impl Into<String>,
        source: S,
        sender: SenderSocket<PriceTick>,
        interval: Duration,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            source,
            sender,
            interval,
        }
    }

    /// Draws the next price, stamps it with the current time and broadcasts it.
    pub async fn publish_next(&mut self) -> Result<PriceTick, ChannelError> {
        let tick = PriceTick::now(self.symbol.clone(), self.source.next_price());
        self.sender.send(&tick).await?;
        Ok(tick)
    }

    /// Publishes forever on the configured interval. Only returns on a
    /// channel error, which is fatal for the process.
    pub async fn run(mut self) -> Result<(), ChannelError> {
        info!(
            "Publisher for '{}' started, one tick every {:?}",
            self.symbol, self.interval
        );
        let mut ticker = tokio::time::interval(self.interval);
        loop {
            ticker.tick().await;
            self.publish_next().await?;
        }
    }
}
