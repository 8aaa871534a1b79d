use crate::process::models::port_allocator::Port;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OrchestratorError {
    #[error("invalid port range: initial port {initial} is above max port {max}")]
    InvalidPortRange { initial: Port, max: Port },

    #[error("port range exhausted: next port would exceed {max}")]
    PortExhausted { max: Port },

    #[error("failed to spawn {name} ({program}): {source}")]
    Spawn {
        name: String,
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unknown worker id {0}")]
    UnknownWorker(usize),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
