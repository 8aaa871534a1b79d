//! Broker adapters consumed by the reconciliation engine through
//! `trading::Broker`.
//!
//! - `alpaca`: REST adapter for an Alpaca account (paper endpoint by default).
//! - `paper`: in-memory broker for dry runs without credentials.

pub mod alpaca;
pub mod paper;

pub use alpaca::{AlpacaBroker, AlpacaCredentials};
pub use paper::PaperBroker;
