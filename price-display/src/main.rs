use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};
use price_display::PriceDisplay;
use std::time::Duration;
use trading_core::args::CommonArgs;
use trading_core::comms::build_subscriber;
use trading_core::framework::shutdown_signal;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Symbols to display
    #[arg(long, value_delimiter = ',', required = true)]
    symbols: Vec<String>,

    /// Aggregator snapshot port (SUB, conflated)
    #[arg(long)]
    source_port: u16,

    /// Milliseconds to pause after each rendered snapshot
    #[arg(long, default_value_t = 1000)]
    pause_ms: u64,

    #[command(flatten)]
    common: CommonArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let source = args.common.connect_address(args.source_port);
    let receiver = build_subscriber(&source)
        .with_context(|| format!("display could not subscribe to {}", source))?;
    info!("Display subscribed to {}", source);

    let display = PriceDisplay::new(args.symbols, receiver, Duration::from_millis(args.pause_ms));

    let outcome = tokio::select! {
        result = display.run() => result,
        _ = shutdown_signal() => Ok(()),
    };
    info!("Display stopped, socket closed.");

    if let Err(e) = &outcome {
        error!("Display failed: {:#}", e);
    }
    outcome
}
