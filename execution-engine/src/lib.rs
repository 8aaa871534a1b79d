pub mod engine;
pub mod io;
pub mod trader;

pub use engine::{CycleOutcome, EngineError, ReconciliationEngine, TraderConfig};
pub use trader::Trader;
