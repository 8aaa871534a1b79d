//! Symbol Publisher: one process, one symbol, one broadcast channel.
//!
//! The price itself comes from a `PriceSource`; the synthetic sources here are
//! stand-ins for a real feed.

pub mod feed;
pub mod publisher;

pub use feed::{PriceModel, RampFeed, RandomFeed};
pub use publisher::SymbolPublisher;
