use crate::engine::{CycleOutcome, ReconciliationEngine};
use anyhow::{Context, Result};
use broker_gateway::PaperBroker;
use log::{debug, info};
use std::sync::Arc;
use std::time::Duration;
use trading::{unix_now, Snapshot};
use trading_core::comms::ReceiverSocket;

/// Snapshot consumer driving one symbol's reconciliation engine.
pub struct Trader {
    engine: ReconciliationEngine,
    receiver: ReceiverSocket<Snapshot>,
    idle: Duration,
    paper: Option<Arc<PaperBroker>>,
}

impl Trader {
    pub fn new(
        engine: ReconciliationEngine,
        receiver: ReceiverSocket<Snapshot>,
        idle: Duration,
    ) -> Self {
        Self {
            engine,
            receiver,
            idle,
            paper: None,
        }
    }

    /// Feeds every received price to a paper account before reconciling, so
    /// its resting orders can fill.
    pub fn with_paper_fills(mut self, paper: Arc<PaperBroker>) -> Self {
        self.paper = Some(paper);
        self
    }

    /// Receives one snapshot and runs one reconciliation cycle on it.
    pub async fn step(&mut self) -> Result<CycleOutcome> {
        let snapshot = self.receiver.recv().await?;

        if let Some(paper) = &self.paper {
            if let Some(tick) = snapshot.get(self.engine.get_symbol()) {
                paper.mark_price(tick.get_symbol(), tick.get_price())?;
            }
        }

        let outcome = self.engine.on_snapshot(&snapshot, unix_now()).await;
        outcome.with_context(|| {
            format!(
                "trader for '{}' cannot use the snapshot",
                self.engine.get_symbol()
            )
        })
    }

    /// Runs until a channel error or a snapshot without a usable tick.
    pub async fn run(mut self) -> Result<()> {
        info!("Trader for '{}' started", self.engine.get_symbol());
        loop {
            match self.step().await? {
                CycleOutcome::Skipped => tokio::time::sleep(self.idle).await,
                outcome => debug!("{}: cycle finished: {:?}", self.engine.get_symbol(), outcome),
            }
        }
    }
}
