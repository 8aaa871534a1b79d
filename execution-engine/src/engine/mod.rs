use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use trading::{
    Broker, BrokerError, LimitOrderRequest, OpenOrder, OrderIntent, OrderRecord, OrderSide,
    Position, PositionResult, PriceTick, Snapshot, TimeInForce,
};

#[derive(Error, Debug, PartialEq)]
pub enum EngineError {
    /// The snapshot entry for our symbol carries another symbol.
    #[error("ticker mismatch: expected {expected}, received {received}")]
    TickerMismatch { expected: String, received: String },
    /// The snapshot has no entry for our symbol.
    #[error("snapshot has no entry for {0}")]
    MissingSymbol(String),
}

#[derive(Debug, Clone)]
pub struct TraderConfig {
    pub symbol: String,
    /// Distance from the last price to each quoted level.
    pub spread: f64,
    /// Shares bought when flat.
    pub quantity: f64,
    pub time_in_force: TimeInForce,
    /// Ticks older than this stop opening new exposure.
    pub stale_after: Duration,
}

impl TraderConfig {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            spread: 1.0,
            quantity: 1.0,
            time_in_force: TimeInForce::Day,
            stale_after: Duration::from_secs(5),
        }
    }
}

/// The price levels one cycle wants to work, before broker state is known.
///
/// Two consecutive equal quotes mean nothing changed and the broker is left
/// alone.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub buy_price: Option<f64>,
    pub sell_price: Option<f64>,
    pub quantity: f64,
}

impl Quote {
    pub fn is_flat(&self) -> bool {
        self.buy_price.is_none() && self.sell_price.is_none()
    }
}

/// Why a cycle stopped before converging.
#[derive(Debug)]
pub enum AbortReason {
    PositionQuery(BrokerError),
    OrderQuery(BrokerError),
    /// More than one order was open. All of them were sent a cancel.
    Anomaly { found: usize, cancel_failures: usize },
    CancelFailed(BrokerError),
    SubmitFailed(BrokerError),
}

/// Result of one reconciliation cycle.
#[derive(Debug)]
pub enum CycleOutcome {
    /// The quote equals the previous one; no broker calls were made.
    Skipped,
    /// The single open order already matched the intent.
    Unchanged,
    /// Nothing should rest; a differing order, if any, was cancelled.
    Flat,
    Submitted(OrderRecord),
    Aborted(AbortReason),
}

/// Converges the broker account towards one symbol's current quote.
pub struct ReconciliationEngine {
    config: TraderConfig,
    broker: Arc<dyn Broker>,
    last_quote: Option<Quote>,
}

impl ReconciliationEngine {
    pub fn new(config: TraderConfig, broker: Arc<dyn Broker>) -> Self {
        Self {
            config,
            broker,
            last_quote: None,
        }
    }

    pub fn get_symbol(&self) -> &str {
        &self.config.symbol
    }

    pub fn last_quote(&self) -> Option<&Quote> {
        self.last_quote.as_ref()
    }

    /// Levels for `tick` as seen at `now` (unix seconds).
    ///
    /// A stale tick yields a flat quote whatever its price.
    pub fn quote_for(&self, tick: &PriceTick, now: f64) -> Quote {
        let stale = tick.age(now) > self.config.stale_after.as_secs_f64();
        if stale {
            warn!(
                "{}: stale tick ({:.1}s old), clearing pending orders",
                self.config.symbol,
                tick.age(now)
            );
            return Quote {
                buy_price: None,
                sell_price: None,
                quantity: self.config.quantity,
            };
        }
        Quote {
            buy_price: Some(tick.get_price() - self.config.spread),
            sell_price: Some(tick.get_price() + self.config.spread),
            quantity: self.config.quantity,
        }
    }

    /// Chooses what should rest at the broker given the quote and the
    /// current position.
    pub fn desired_intent(&self, quote: &Quote, position: Option<&Position>) -> OrderIntent {
        match (position, quote.buy_price, quote.sell_price) {
            (None, Some(buy_price), _) => OrderIntent::Place(LimitOrderRequest::new(
                self.config.symbol.as_str(),
                OrderSide::Buy,
                buy_price,
                quote.quantity,
                self.config.time_in_force,
            )),
            (Some(position), _, Some(sell_price)) => OrderIntent::Place(LimitOrderRequest::new(
                self.config.symbol.as_str(),
                OrderSide::Sell,
                sell_price,
                position.get_quantity(),
                self.config.time_in_force,
            )),
            _ => OrderIntent::Flat,
        }
    }

    /// Runs one cycle for the snapshot. A snapshot without our symbol is
    /// an error, like a foreign tick.
    pub async fn on_snapshot(
        &mut self,
        snapshot: &Snapshot,
        now: f64,
    ) -> Result<CycleOutcome, EngineError> {
        let tick = snapshot
            .get(&self.config.symbol)
            .ok_or_else(|| EngineError::MissingSymbol(self.config.symbol.clone()))?;
        self.evaluate(tick, now).await
    }

    /// Runs one cycle for our symbol's latest tick.
    ///
    /// Only a ticker mismatch is an error. Broker failures abort the cycle
    /// and are reported in the outcome.
    pub async fn evaluate(
        &mut self,
        tick: &PriceTick,
        now: f64,
    ) -> Result<CycleOutcome, EngineError> {
        if tick.get_symbol() != self.config.symbol {
            return Err(EngineError::TickerMismatch {
                expected: self.config.symbol.clone(),
                received: tick.get_symbol().to_string(),
            });
        }

        let quote = self.quote_for(tick, now);
        if self.last_quote.as_ref() == Some(&quote) {
            return Ok(CycleOutcome::Skipped);
        }
        // Recorded before acting so a failing quote is not retried every cycle.
        self.last_quote = Some(quote.clone());

        Ok(self.reconcile(&quote).await)
    }

    async fn reconcile(&self, quote: &Quote) -> CycleOutcome {
        let symbol = self.config.symbol.as_str();

        let position = match self.broker.get_open_position(symbol).await {
            PositionResult::Found(position) => Some(position),
            PositionResult::NotFound => None,
            PositionResult::Error(e) => {
                warn!("{}: position query failed: {}", symbol, e);
                return CycleOutcome::Aborted(AbortReason::PositionQuery(e));
            }
        };
        let intent = self.desired_intent(quote, position.as_ref());

        let orders = match self.broker.get_open_orders(symbol).await {
            Ok(orders) => orders,
            Err(e) => {
                warn!("{}: open orders query failed: {}", symbol, e);
                return CycleOutcome::Aborted(AbortReason::OrderQuery(e));
            }
        };

        match orders.as_slice() {
            [] => {}
            [existing] => {
                if intent.is_satisfied_by(existing) {
                    info!("{}: Order already exists", symbol);
                    return CycleOutcome::Unchanged;
                }
                if let Err(e) = self.broker.cancel_order(existing.get_id()).await {
                    warn!(
                        "{}: failed to cancel order {}: {}",
                        symbol,
                        existing.get_id(),
                        e
                    );
                    return CycleOutcome::Aborted(AbortReason::CancelFailed(e));
                }
                debug!("{}: cancelled differing order {}", symbol, existing);
            }
            many => return self.cancel_anomaly(many).await,
        }

        match intent {
            OrderIntent::Flat => CycleOutcome::Flat,
            OrderIntent::Place(request) => match self.broker.submit_order(&request).await {
                Ok(record) => {
                    info!("Order updated: {}", record);
                    CycleOutcome::Submitted(record)
                }
                Err(e) => {
                    warn!("{}: order submission failed: {}", symbol, e);
                    CycleOutcome::Aborted(AbortReason::SubmitFailed(e))
                }
            },
        }
    }

    /// Cancels every open order. Nothing is submitted in the same cycle.
    async fn cancel_anomaly(&self, orders: &[OpenOrder]) -> CycleOutcome {
        let symbol = self.config.symbol.as_str();
        warn!(
            "{}: {} open orders found, cancelling all of them",
            symbol,
            orders.len()
        );

        let mut cancel_failures = 0;
        for order in orders {
            match self.broker.cancel_order(order.get_id()).await {
                Ok(()) => info!("{}: cancelled order {}", symbol, order.get_id()),
                Err(e) => {
                    cancel_failures += 1;
                    warn!(
                        "{}: failed to cancel order {}: {}",
                        symbol,
                        order.get_id(),
                        e
                    );
                }
            }
        }
        CycleOutcome::Aborted(AbortReason::Anomaly {
            found: orders.len(),
            cancel_failures,
        })
    }
}
