use crate::model::order::{LimitOrderRequest, OpenOrder, OrderRecord};
use crate::model::position::PositionResult;
use async_trait::async_trait;
use thiserror::Error;

/// Failure of a single broker call.
#[derive(Error, Debug)]
pub enum BrokerError {
    /// The request never produced a response (connection, TLS, timeout).
    #[error("transport error: {0}")]
    Transport(String),

    /// The broker answered with a non-success status.
    #[error("broker rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The response body could not be understood.
    #[error("malformed broker response: {0}")]
    Decode(String),

    /// The order id is unknown to the broker.
    #[error("order {0} not found")]
    OrderNotFound(String),
}

/// The narrow slice of a brokerage account the reconciliation engine needs.
///
/// Every call is a single attempt; callers decide what a failure means for
/// their cycle.
#[async_trait]
pub trait Broker: Send + Sync {
    /// Current position for `symbol`.
    async fn get_open_position(&self, symbol: &str) -> PositionResult;

    /// Orders still open for `symbol`.
    async fn get_open_orders(&self, symbol: &str) -> Result<Vec<OpenOrder>, BrokerError>;

    /// Cancels a live order by id.
    async fn cancel_order(&self, order_id: &str) -> Result<(), BrokerError>;

    /// Submits a new limit order.
    async fn submit_order(&self, request: &LimitOrderRequest) -> Result<OrderRecord, BrokerError>;
}
