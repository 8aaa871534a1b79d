use crate::comms::error::ChannelError;
use async_trait::async_trait;

/// Abstraction for the incoming transport layer (reading raw bytes).
/// Implementation details (ZMQ, Memory) are hidden behind this trait.
///
/// Every implementation conflates: a reader that falls behind only ever sees
/// the most recent message, never a backlog.
#[async_trait]
pub trait TransportInput: Send + Sync {
    /// Receive the latest unread message.
    ///
    /// Waits until a message newer than the last one returned exists. The
    /// first call waits for the first publication, however long that takes.
    async fn recv_bytes(&mut self) -> Result<Vec<u8>, ChannelError>;

    /// Return the latest unread message if one is buffered, without waiting.
    async fn try_recv(&mut self) -> Result<Option<Vec<u8>>, ChannelError>;
}

/// Abstraction for the outgoing transport layer (sending raw bytes).
///
/// Sending is best-effort broadcast: it never waits for readers.
#[async_trait]
pub trait TransportOutput: Send + Sync {
    /// Send a full frame/message.
    async fn send_bytes(&self, data: &[u8]) -> Result<(), ChannelError>;
}
