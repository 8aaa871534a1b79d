use async_trait::async_trait;
use log::{debug, info};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use trading::{
    Broker, BrokerError, LimitOrderRequest, OpenOrder, OrderRecord, OrderSide, Position,
    PositionResult,
};
use uuid::Uuid;

#[derive(Debug, Default)]
struct Book {
    positions: HashMap<String, f64>,
    orders: Vec<OpenOrder>,
}

/// In-process broker simulation.
///
/// Orders rest until [`PaperBroker::mark_price`] crosses their limit, at
/// which point they fill completely at the limit price and adjust the
/// symbol's position. A position that returns to zero is closed.
#[derive(Debug, Default)]
pub struct PaperBroker {
    book: Mutex<Book>,
}

impl PaperBroker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts the account with an existing position.
    pub fn with_position(self, symbol: &str, quantity: f64) -> Self {
        if let Ok(mut book) = self.book.lock() {
            book.positions.insert(symbol.to_string(), quantity);
        }
        self
    }

    fn book(&self) -> Result<MutexGuard<'_, Book>, BrokerError> {
        self.book
            .lock()
            .map_err(|_| BrokerError::Transport("paper book lock poisoned".to_string()))
    }

    /// Fills every resting order on `symbol` that `price` crosses. A buy
    /// fills when the market trades at or below its limit, a sell at or above.
    ///
    /// Returns the filled orders.
    pub fn mark_price(&self, symbol: &str, price: f64) -> Result<Vec<OpenOrder>, BrokerError> {
        let mut book = self.book()?;
        let (filled, resting): (Vec<OpenOrder>, Vec<OpenOrder>) =
            book.orders.drain(..).partition(|order| {
                order.get_symbol() == symbol
                    && match order.get_side() {
                        OrderSide::Buy => price <= order.get_limit_price(),
                        OrderSide::Sell => price >= order.get_limit_price(),
                    }
            });
        book.orders = resting;

        for order in &filled {
            let delta = match order.get_side() {
                OrderSide::Buy => order.get_quantity(),
                OrderSide::Sell => -order.get_quantity(),
            };
            let entry = book.positions.entry(symbol.to_string()).or_insert(0.0);
            *entry += delta;
            if entry.abs() < f64::EPSILON {
                book.positions.remove(symbol);
            }
            info!("Paper fill: {}", order);
        }
        Ok(filled)
    }

    pub fn get_order_count(&self) -> usize {
        self.book().map(|book| book.orders.len()).unwrap_or(0)
    }
}

#[async_trait]
impl Broker for PaperBroker {
    async fn get_open_position(&self, symbol: &str) -> PositionResult {
        match self.book() {
            Ok(book) => match book.positions.get(symbol) {
                Some(quantity) => PositionResult::Found(Position::new(symbol, *quantity)),
                None => PositionResult::NotFound,
            },
            Err(e) => PositionResult::Error(e),
        }
    }

    async fn get_open_orders(&self, symbol: &str) -> Result<Vec<OpenOrder>, BrokerError> {
        let book = self.book()?;
        Ok(book
            .orders
            .iter()
            .filter(|order| order.get_symbol() == symbol)
            .cloned()
            .collect())
    }

    async fn cancel_order(&self, order_id: &str) -> Result<(), BrokerError> {
        let mut book = self.book()?;
        let before = book.orders.len();
        book.orders.retain(|order| order.get_id() != order_id);
        if book.orders.len() == before {
            return Err(BrokerError::OrderNotFound(order_id.to_string()));
        }
        debug!("Paper order {} cancelled", order_id);
        Ok(())
    }

    async fn submit_order(&self, request: &LimitOrderRequest) -> Result<OrderRecord, BrokerError> {
        let order = OpenOrder::from_request(Uuid::new_v4().to_string(), request);
        self.book()?.orders.push(order.clone());
        debug!("Paper order accepted: {}", order);
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trading::TimeInForce;

    fn buy(price: f64) -> LimitOrderRequest {
        LimitOrderRequest::new("AAPL", OrderSide::Buy, price, 1.0, TimeInForce::Day)
    }

    #[tokio::test]
    async fn submitted_order_rests_until_price_crosses() {
        let broker = PaperBroker::new();
        let order = broker.submit_order(&buy(99.0)).await.unwrap();

        assert!(broker.mark_price("AAPL", 99.5).unwrap().is_empty());
        assert_eq!(broker.get_open_orders("AAPL").await.unwrap().len(), 1);

        let filled = broker.mark_price("AAPL", 98.9).unwrap();
        assert_eq!(filled[0].get_id(), order.get_id());
        assert!(broker.get_open_orders("AAPL").await.unwrap().is_empty());

        match broker.get_open_position("AAPL").await {
            PositionResult::Found(position) => assert_eq!(position.get_quantity(), 1.0),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn selling_the_whole_position_closes_it() {
        let broker = PaperBroker::new().with_position("AAPL", 1.0);
        broker
            .submit_order(&LimitOrderRequest::new(
                "AAPL",
                OrderSide::Sell,
                101.0,
                1.0,
                TimeInForce::Day,
            ))
            .await
            .unwrap();

        broker.mark_price("AAPL", 101.0).unwrap();
        assert!(matches!(
            broker.get_open_position("AAPL").await,
            PositionResult::NotFound
        ));
    }

    #[tokio::test]
    async fn orders_are_scoped_by_symbol() {
        let broker = PaperBroker::new();
        broker.submit_order(&buy(99.0)).await.unwrap();

        assert!(broker.get_open_orders("MSFT").await.unwrap().is_empty());
        assert!(broker.mark_price("MSFT", 1.0).unwrap().is_empty());
        assert_eq!(broker.get_order_count(), 1);
    }

    #[tokio::test]
    async fn cancelling_unknown_order_fails() {
        let broker = PaperBroker::new();
        let order = broker.submit_order(&buy(99.0)).await.unwrap();

        broker.cancel_order(order.get_id()).await.unwrap();
        assert!(matches!(
            broker.cancel_order(order.get_id()).await,
            Err(BrokerError::OrderNotFound(_))
        ));
    }
}
