use anyhow::{Context, Result};
use broker_gateway::{AlpacaBroker, AlpacaCredentials, PaperBroker};
use clap::Parser;
use execution_engine::io::{Args, BrokerKind};
use execution_engine::{ReconciliationEngine, Trader, TraderConfig};
use log::{error, info};
use std::sync::Arc;
use std::time::Duration;
use trading::{Broker, Snapshot};
use trading_core::comms::{build_subscriber, ReceiverSocket};
use trading_core::framework::shutdown_signal;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = TraderConfig {
        symbol: args.symbol.clone(),
        spread: args.spread,
        quantity: args.quantity,
        time_in_force: args.time_in_force,
        stale_after: Duration::from_secs_f64(args.stale_after_secs.max(0.0)),
    };

    let source = args.common.connect_address(args.source_port);
    let receiver: ReceiverSocket<Snapshot> = build_subscriber(&source).with_context(|| {
        format!(
            "trader for '{}' could not subscribe to {}",
            args.symbol, source
        )
    })?;
    info!("Trader for '{}' reading snapshots from {}", args.symbol, source);

    // Each trader process builds its own broker client.
    let idle = Duration::from_millis(args.idle_ms);
    let trader = match args.broker {
        BrokerKind::Alpaca => {
            let credentials = AlpacaCredentials::from_env();
            info!("Using Alpaca account at {}", credentials.get_base_url());
            let broker: Arc<dyn Broker> = Arc::new(AlpacaBroker::new(credentials)?);
            Trader::new(ReconciliationEngine::new(config, broker), receiver, idle)
        }
        BrokerKind::Paper => {
            info!("Using in-process paper account");
            let paper = Arc::new(PaperBroker::new());
            Trader::new(ReconciliationEngine::new(config, paper.clone()), receiver, idle)
                .with_paper_fills(paper)
        }
    };

    let outcome = tokio::select! {
        result = trader.run() => result,
        _ = shutdown_signal() => Ok(()),
    };
    info!("Trader for '{}' stopped, socket closed.", args.symbol);

    if let Err(e) = outcome {
        error!("Trader for '{}' failed: {:#}", args.symbol, e);
        return Err(e);
    }
    Ok(())
}
