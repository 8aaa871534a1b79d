//! A synthetic per-symbol price publisher.
//!
//! Binds one broadcast channel and publishes a tick for its symbol on a fixed
//! short interval until terminated.

use anyhow::{Context, Result};
use clap::Parser;
use dummy_feed::{PriceModel, SymbolPublisher};
use log::{error, info};
use std::time::Duration;
use trading::PriceTick;
use trading_core::args::CommonArgs;
use trading_core::comms::{build_publisher, SenderSocket};
use trading_core::framework::shutdown_signal;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Symbol to publish ticks for
    #[arg(long)]
    symbol: String,

    /// Port to bind the tick publisher on (PUB socket)
    #[arg(long)]
    port: u16,

    /// Milliseconds between ticks
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..))]
    interval_ms: u64,

    /// Price generator
    #[arg(long, value_enum, default_value_t = PriceModel::Ramp)]
    model: PriceModel,

    #[arg(long, default_value_t = 100.0)]
    start_price: f64,

    /// Increment per tick for the ramp model
    #[arg(long, default_value_t = 0.1)]
    step: f64,

    #[command(flatten)]
    common: CommonArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let address = args.common.publish_address(args.port);
    let sender: SenderSocket<PriceTick> = build_publisher(&address)
        .with_context(|| format!("publisher for '{}' could not bind {}", args.symbol, address))?;
    info!("Publishing '{}' on {}", args.symbol, address);

    let publisher = SymbolPublisher::new(
        args.symbol.clone(),
        args.model.build(args.start_price, args.step),
        sender,
        Duration::from_millis(args.interval_ms),
    );

    // Dropping the publisher (either branch) closes its socket.
    let outcome = tokio::select! {
        result = publisher.run() => result,
        _ = shutdown_signal() => Ok(()),
    };
    info!("Publisher for '{}' stopped, socket closed.", args.symbol);

    if let Err(e) = outcome {
        error!("Publisher for '{}' failed: {}", args.symbol, e);
        return Err(e.into());
    }
    Ok(())
}
