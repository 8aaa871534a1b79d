use clap::{Parser, ValueEnum};
use trading::TimeInForce;
use trading_core::args::CommonArgs;

/// Which account the trader reconciles against.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrokerKind {
    /// Alpaca REST API, credentials from the environment
    Alpaca,
    /// In-process simulated account filled from the snapshot prices
    Paper,
}

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Symbol this trader manages
    #[arg(long)]
    pub symbol: String,

    /// Port of the aggregated snapshot channel (PUB socket)
    /// Trader will Connect (SUB) to this port.
    #[arg(long)]
    pub source_port: u16,

    /// Distance between the last price and the buy/sell limits
    #[arg(long, default_value_t = 1.0)]
    pub spread: f64,

    /// Shares to buy when the account holds none
    #[arg(long, default_value_t = 1.0)]
    pub quantity: f64,

    #[arg(long, default_value_t = TimeInForce::Day)]
    pub time_in_force: TimeInForce,

    /// Seconds after which a tick no longer opens exposure
    #[arg(long, default_value_t = 5.0)]
    pub stale_after_secs: f64,

    /// Pause after a cycle that needed no broker calls
    #[arg(long, default_value_t = 10)]
    pub idle_ms: u64,

    #[arg(long, value_enum, default_value_t = BrokerKind::Alpaca)]
    pub broker: BrokerKind,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_trader() {
        let args = Args::parse_from([
            "execution-engine",
            "--symbol",
            "AAPL",
            "--source-port",
            "13145",
        ]);
        assert_eq!(args.spread, 1.0);
        assert_eq!(args.quantity, 1.0);
        assert_eq!(args.time_in_force, TimeInForce::Day);
        assert_eq!(args.stale_after_secs, 5.0);
        assert_eq!(args.broker, BrokerKind::Alpaca);
    }

    #[test]
    fn broker_and_time_in_force_are_selectable() {
        let args = Args::parse_from([
            "execution-engine",
            "--symbol",
            "TSLA",
            "--source-port",
            "13145",
            "--broker",
            "paper",
            "--time-in-force",
            "gtc",
        ]);
        assert_eq!(args.broker, BrokerKind::Paper);
        assert_eq!(args.time_in_force, TimeInForce::Gtc);
    }
}
