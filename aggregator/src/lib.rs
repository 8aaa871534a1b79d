//! Aggregator: subscribes to every symbol's tick channel and periodically
//! broadcasts one cross-symbol `Snapshot`.
//!
//! Assembly runs at a deliberately lower rate than publication to bound
//! downstream load. Readers that need sub-second freshness can subscribe to a
//! publisher directly.

pub mod aggregator;

pub use aggregator::PriceAggregator;
