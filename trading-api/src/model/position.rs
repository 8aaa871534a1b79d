use crate::traits::broker::BrokerError;
use serde::{Deserialize, Serialize};

/// A broker-owned holding. Always queried fresh, never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    symbol: String,
    quantity: f64,
}

impl Position {
    pub fn new(symbol: impl Into<String>, quantity: f64) -> Self {
        Self {
            symbol: symbol.into(),
            quantity,
        }
    }

    pub fn get_symbol(&self) -> &str {
        &self.symbol
    }

    pub fn get_quantity(&self) -> f64 {
        self.quantity
    }
}

/// Outcome of a position query.
///
/// The broker adapter decides which variant applies; "no position" is an
/// ordinary answer, not an error.
#[derive(Debug)]
pub enum PositionResult {
    Found(Position),
    NotFound,
    Error(BrokerError),
}
