use log::{debug, info};
use std::time::Duration;
use trading::{PriceTick, Snapshot};
use trading_core::comms::{ChannelError, ReceiverSocket, SenderSocket};

/// One conflating subscription per symbol channel, plus the last tick each
/// one delivered.
struct Source {
    label: String,
    receiver: ReceiverSocket<PriceTick>,
    last: Option<PriceTick>,
}

impl Source {
    /// Latest tick for this channel.
    ///
    /// Waits only for the very first tick. After that it takes a newer tick
    /// if one is buffered and otherwise reuses the last one, so a quiet
    /// symbol keeps reporting its (ageing) price.
    async fn latest(&mut self) -> Result<PriceTick, ChannelError> {
        let tick = match self.last.take() {
            None => {
                debug!("Waiting for first tick from {}", self.label);
                self.receiver.recv().await?
            }
            Some(previous) => self.receiver.try_recv().await?.unwrap_or(previous),
        };
        self.last = Some(tick.clone());
        Ok(tick)
    }
}

pub struct PriceAggregator {
    sources: Vec<Source>,
    sender: SenderSocket<Snapshot>,
    period: Duration,
}

impl PriceAggregator {
    /// # Arguments
    ///
    /// * `sender` - Snapshot broadcast channel.
    /// * `period` - Pause between two snapshots.
    pub fn new(sender: SenderSocket<Snapshot>, period: Duration) -> Self {
        Self {
            sources: Vec::new(),
            sender,
            period,
        }
    }

    /// Adds a symbol channel. `label` only identifies it in logs; snapshot
    /// entries are keyed by the symbol carried in each tick.
    pub fn add_source(&mut self, label: impl Into<String>, receiver: ReceiverSocket<PriceTick>) {
        self.sources.push(Source {
            label: label.into(),
            receiver,
            last: None,
        });
    }

    pub fn get_source_count(&self) -> usize {
        self.sources.len()
    }

    /// Performs one receive per source and composes the results.
    pub async fn assemble(&mut self) -> Result<Snapshot, ChannelError> {
        let mut snapshot = Snapshot::new();
        for source in self.sources.iter_mut() {
            snapshot.insert(source.latest().await?);
        }
        Ok(snapshot)
    }

    /// Assembles and broadcasts one snapshot.
    pub async fn publish_once(&mut self) -> Result<Snapshot, ChannelError> {
        let snapshot = self.assemble().await?;
        self.sender.send(&snapshot).await?;
        Ok(snapshot)
    }

    /// Runs forever. Only returns on a channel error, which is fatal.
    pub async fn run(mut self) -> Result<(), ChannelError> {
        info!(
            "Aggregator started with {} sources, one snapshot every {:?}",
            self.get_source_count(),
            self.period
        );
        loop {
            let snapshot = self.publish_once().await?;
            debug!("Published snapshot of {} symbols", snapshot.get_count());
            tokio::time::sleep(self.period).await;
        }
    }
}
