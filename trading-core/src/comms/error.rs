use thiserror::Error;

/// Failures of the channel primitive. All of them are fatal to the owning
/// worker: it releases its sockets and exits.
#[derive(Error, Debug)]
pub enum ChannelError {
    #[error("failed to bind publisher on {address}: {source}")]
    Bind {
        address: String,
        source: zmq::Error,
    },

    #[error("failed to connect subscriber to {address}: {source}")]
    Connect {
        address: String,
        source: zmq::Error,
    },

    #[error("socket setup failed: {0}")]
    Setup(#[from] zmq::Error),

    #[error("send failed: {0}")]
    Send(String),

    #[error("receive failed: {0}")]
    Recv(String),

    #[error("failed to encode message: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("failed to decode message: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("channel {0} closed")]
    Closed(String),

    #[error("unsupported address: {0}")]
    Unsupported(String),
}
