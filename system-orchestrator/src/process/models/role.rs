use serde::{Deserialize, Serialize};
use std::fmt;

/// The kinds of worker process the pipeline is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkerRole {
    Publisher,
    Aggregator,
    Display,
    Trader,
}

impl WorkerRole {
    /// Executable implementing the role, looked up in the binary directory.
    pub fn binary_name(&self) -> &'static str {
        match self {
            WorkerRole::Publisher => "dummy-feed",
            WorkerRole::Aggregator => "aggregator",
            WorkerRole::Display => "price-display",
            WorkerRole::Trader => "execution-engine",
        }
    }
}

impl fmt::Display for WorkerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WorkerRole::Publisher => "publisher",
            WorkerRole::Aggregator => "aggregator",
            WorkerRole::Display => "display",
            WorkerRole::Trader => "trader",
        };
        write!(f, "{}", s)
    }
}
