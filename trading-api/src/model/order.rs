//! Order models shared between the reconciliation engine and broker adapters.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Rounds a price or quantity to two decimal places.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderSide::Buy => write!(f, "buy"),
            OrderSide::Sell => write!(f, "sell"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeInForce {
    Day,
    Gtc,
    Opg,
    Cls,
    Ioc,
    Fok,
}

impl Default for TimeInForce {
    fn default() -> Self {
        TimeInForce::Day
    }
}

impl fmt::Display for TimeInForce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TimeInForce::Day => "day",
            TimeInForce::Gtc => "gtc",
            TimeInForce::Opg => "opg",
            TimeInForce::Cls => "cls",
            TimeInForce::Ioc => "ioc",
            TimeInForce::Fok => "fok",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for TimeInForce {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "day" => Ok(TimeInForce::Day),
            "gtc" => Ok(TimeInForce::Gtc),
            "opg" => Ok(TimeInForce::Opg),
            "cls" => Ok(TimeInForce::Cls),
            "ioc" => Ok(TimeInForce::Ioc),
            "fok" => Ok(TimeInForce::Fok),
            other => Err(format!("unknown time in force: {}", other)),
        }
    }
}

/// A limit order the engine wants resting at the broker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LimitOrderRequest {
    symbol: String,
    side: OrderSide,
    limit_price: f64,
    quantity: f64,
    time_in_force: TimeInForce,
}

impl LimitOrderRequest {
    /// Creates a new limit order request. The limit price is rounded to cents.
    ///
    /// # Arguments
    ///
    /// * `symbol` - The symbol to trade.
    /// * `side` - Buy or sell.
    /// * `limit_price` - Worst acceptable price.
    /// * `quantity` - Number of shares.
    /// * `time_in_force` - How long the order rests.
    pub fn new(
        symbol: impl Into<String>,
        side: OrderSide,
        limit_price: f64,
        quantity: f64,
        time_in_force: TimeInForce,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            limit_price: round_cents(limit_price),
            quantity,
            time_in_force,
        }
    }

    pub fn get_symbol(&self) -> &str {
        &self.symbol
    }

    pub fn get_side(&self) -> OrderSide {
        self.side
    }

    pub fn get_limit_price(&self) -> f64 {
        self.limit_price
    }

    pub fn get_quantity(&self) -> f64 {
        self.quantity
    }

    pub fn get_time_in_force(&self) -> TimeInForce {
        self.time_in_force
    }

    /// True when `order` already expresses this request.
    ///
    /// Price and quantity are compared after rounding both sides to two
    /// decimals.
    pub fn matches(&self, order: &OpenOrder) -> bool {
        self.side == order.side
            && round_cents(self.limit_price) == round_cents(order.limit_price)
            && round_cents(self.quantity) == round_cents(order.quantity)
            && self.time_in_force == order.time_in_force
    }
}

/// An order that is live at the broker, as reported by an open-orders query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenOrder {
    id: String,
    symbol: String,
    side: OrderSide,
    limit_price: f64,
    quantity: f64,
    time_in_force: TimeInForce,
}

impl OpenOrder {
    pub fn new(
        id: impl Into<String>,
        symbol: impl Into<String>,
        side: OrderSide,
        limit_price: f64,
        quantity: f64,
        time_in_force: TimeInForce,
    ) -> Self {
        Self {
            id: id.into(),
            symbol: symbol.into(),
            side,
            limit_price,
            quantity,
            time_in_force,
        }
    }

    /// Builds the record a broker keeps for an accepted request.
    pub fn from_request(id: impl Into<String>, request: &LimitOrderRequest) -> Self {
        Self::new(
            id,
            request.symbol.clone(),
            request.side,
            request.limit_price,
            request.quantity,
            request.time_in_force,
        )
    }

    pub fn get_id(&self) -> &str {
        &self.id
    }

    pub fn get_symbol(&self) -> &str {
        &self.symbol
    }

    pub fn get_side(&self) -> OrderSide {
        self.side
    }

    pub fn get_limit_price(&self) -> f64 {
        self.limit_price
    }

    pub fn get_quantity(&self) -> f64 {
        self.quantity
    }

    pub fn get_time_in_force(&self) -> TimeInForce {
        self.time_in_force
    }
}

impl fmt::Display for OpenOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: {} @ {}",
            self.symbol, self.side, self.quantity, self.limit_price
        )
    }
}

/// The broker's acknowledgement of a submitted order.
pub type OrderRecord = OpenOrder;

/// What the engine wants resting at the broker for one symbol this cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderIntent {
    /// No order should rest for the symbol.
    Flat,
    /// Exactly this limit order should rest for the symbol.
    Place(LimitOrderRequest),
}

impl OrderIntent {
    pub fn request(&self) -> Option<&LimitOrderRequest> {
        match self {
            OrderIntent::Flat => None,
            OrderIntent::Place(request) => Some(request),
        }
    }

    /// True when `order` already satisfies the intent. A flat intent is never
    /// satisfied by a resting order.
    pub fn is_satisfied_by(&self, order: &OpenOrder) -> bool {
        self.request().is_some_and(|request| request.matches(order))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resting(side: OrderSide, price: f64, qty: f64, tif: TimeInForce) -> OpenOrder {
        OpenOrder::new("o-1", "AAPL", side, price, qty, tif)
    }

    #[test]
    fn request_rounds_limit_price_to_cents() {
        let request =
            LimitOrderRequest::new("AAPL", OrderSide::Buy, 100.3 - 1.0, 1.0, TimeInForce::Day);
        assert_eq!(request.get_limit_price(), 99.3);
    }

    #[test]
    fn matching_ignores_sub_cent_noise() {
        let request = LimitOrderRequest::new("AAPL", OrderSide::Buy, 99.3, 1.0, TimeInForce::Day);
        assert!(request.matches(&resting(OrderSide::Buy, 99.300000001, 1.0, TimeInForce::Day)));
        assert!(request.matches(&resting(OrderSide::Buy, 99.3, 1.004, TimeInForce::Day)));
    }

    #[test]
    fn any_differing_field_breaks_the_match() {
        let request = LimitOrderRequest::new("AAPL", OrderSide::Buy, 99.3, 1.0, TimeInForce::Day);
        assert!(!request.matches(&resting(OrderSide::Sell, 99.3, 1.0, TimeInForce::Day)));
        assert!(!request.matches(&resting(OrderSide::Buy, 99.31, 1.0, TimeInForce::Day)));
        assert!(!request.matches(&resting(OrderSide::Buy, 99.3, 2.0, TimeInForce::Day)));
        assert!(!request.matches(&resting(OrderSide::Buy, 99.3, 1.0, TimeInForce::Gtc)));
    }

    #[test]
    fn flat_intent_is_never_satisfied() {
        let order = resting(OrderSide::Buy, 99.3, 1.0, TimeInForce::Day);
        assert!(!OrderIntent::Flat.is_satisfied_by(&order));
    }

    #[test]
    fn time_in_force_parses_case_insensitively() {
        assert_eq!("GTC".parse::<TimeInForce>(), Ok(TimeInForce::Gtc));
        assert!("week".parse::<TimeInForce>().is_err());
    }
}
