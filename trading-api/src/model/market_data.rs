//! Market Data models.
//!
//! Includes `PriceTick` for individual observations and `Snapshot` for the
//! aggregated, cross-symbol view published by the aggregator.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

/// Current wall-clock time as fractional unix seconds.
pub fn unix_now() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or_default()
}

/// A single timestamped price observation for a symbol.
///
/// Serialized as `{"symbol": .., "price": .., "time": ..}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceTick {
    symbol: String,
    price: f64,
    /// Unix timestamp in seconds.
    #[serde(rename = "time")]
    timestamp: f64,
}

impl PriceTick {
    /// Creates a new PriceTick.
    ///
    /// # Arguments
    ///
    /// * `symbol` - The traded symbol, e.g. "AAPL".
    /// * `price` - The observed price.
    /// * `timestamp` - Unix seconds at which the price was observed.
    pub fn new(symbol: impl Into<String>, price: f64, timestamp: f64) -> Self {
        Self {
            symbol: symbol.into(),
            price,
            timestamp,
        }
    }

    /// Creates a tick stamped with the current time.
    pub fn now(symbol: impl Into<String>, price: f64) -> Self {
        Self::new(symbol, price, unix_now())
    }

    pub fn get_symbol(&self) -> &str {
        &self.symbol
    }

    pub fn get_price(&self) -> f64 {
        self.price
    }

    pub fn get_timestamp(&self) -> f64 {
        self.timestamp
    }

    /// Seconds elapsed between the tick and `now`.
    pub fn age(&self, now: f64) -> f64 {
        now - self.timestamp
    }
}

/// The latest known tick per symbol, assembled once per aggregation cycle.
///
/// A symbol that never ticked is absent. A symbol that went quiet keeps its
/// last tick; consumers judge staleness from the timestamp.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    ticks: BTreeMap<String, PriceTick>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a tick under its own symbol, replacing any previous entry.
    pub fn insert(&mut self, tick: PriceTick) {
        self.ticks.insert(tick.symbol.clone(), tick);
    }

    pub fn get(&self, symbol: &str) -> Option<&PriceTick> {
        self.ticks.get(symbol)
    }

    pub fn get_count(&self) -> usize {
        self.ticks.len()
    }
}

impl FromIterator<PriceTick> for Snapshot {
    fn from_iter<I: IntoIterator<Item = PriceTick>>(iter: I) -> Self {
        let mut snapshot = Snapshot::new();
        for tick in iter {
            snapshot.insert(tick);
        }
        snapshot
    }
}
