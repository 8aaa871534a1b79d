use aggregator::PriceAggregator;
use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{error, info};
use std::time::Duration;
use trading::Snapshot;
use trading_core::args::CommonArgs;
use trading_core::comms::{build_publisher, build_subscriber, SenderSocket};
use trading_core::framework::shutdown_signal;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Symbols, in the same order as --source-ports
    #[arg(long, value_delimiter = ',', required = true)]
    symbols: Vec<String>,

    /// Publisher port of each symbol (SUB, conflated)
    #[arg(long, value_delimiter = ',', required = true)]
    source_ports: Vec<u16>,

    /// Port to publish snapshots on (PUB socket)
    #[arg(long)]
    port: u16,

    /// Milliseconds between snapshots
    #[arg(long, default_value_t = 1000)]
    period_ms: u64,

    #[command(flatten)]
    common: CommonArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    if args.symbols.len() != args.source_ports.len() {
        bail!(
            "{} symbols but {} source ports",
            args.symbols.len(),
            args.source_ports.len()
        );
    }

    let address = args.common.publish_address(args.port);
    let sender: SenderSocket<Snapshot> = build_publisher(&address)
        .with_context(|| format!("aggregator could not bind {}", address))?;
    info!("Publishing snapshots on {}", address);

    let mut aggregator = PriceAggregator::new(sender, Duration::from_millis(args.period_ms));
    for (symbol, port) in args.symbols.iter().zip(&args.source_ports) {
        let source = args.common.connect_address(*port);
        let receiver = build_subscriber(&source)
            .with_context(|| format!("could not subscribe to '{}' at {}", symbol, source))?;
        info!("Subscribed to '{}' at {}", symbol, source);
        aggregator.add_source(symbol.clone(), receiver);
    }

    let outcome = tokio::select! {
        result = aggregator.run() => result,
        _ = shutdown_signal() => Ok(()),
    };
    info!("Aggregator stopped, sockets closed.");

    if let Err(e) = outcome {
        error!("Aggregator failed: {}", e);
        return Err(e.into());
    }
    Ok(())
}
