pub mod model;
pub mod traits;

pub use model::market_data::{PriceTick, Snapshot, unix_now};
pub use model::order::{
    LimitOrderRequest, OpenOrder, OrderIntent, OrderRecord, OrderSide, TimeInForce, round_cents,
};
pub use model::position::{Position, PositionResult};
pub use traits::broker::{Broker, BrokerError};
pub use traits::data_feed::PriceSource;
