//! Typed socket abstractions.
//!
//! Provides `ReceiverSocket` and `SenderSocket` which handle JSON
//! serialization/deserialization automatically.

use crate::comms::error::ChannelError;
use crate::comms::transport::{TransportInput, TransportOutput};
use serde::{de::DeserializeOwned, Serialize};
use std::marker::PhantomData;

/// A strongly-typed, conflating input socket.
pub struct ReceiverSocket<C> {
    transport: Box<dyn TransportInput>,
    _marker: PhantomData<C>,
}

impl<C> ReceiverSocket<C>
where
    C: DeserializeOwned,
{
    /// Creates a new ReceiverSocket from a raw transport backend.
    ///
    /// # Arguments
    ///
    /// * `transport` - The underlying transport implementation (e.g. ZMQ, Memory).
    pub fn new(transport: Box<dyn TransportInput>) -> Self {
        Self {
            transport,
            _marker: PhantomData,
        }
    }

    /// Receives the most recent message and deserializes it.
    ///
    /// Messages published between two calls and never read are discarded.
    /// The first call waits until the publisher has sent something.
    ///
    /// # Returns
    ///
    /// * `Ok(C)` containing the deserialized message.
    /// * `Err` if transport fails or deserialization error occurs.
    pub async fn recv(&mut self) -> Result<C, ChannelError> {
        let bytes = self.transport.recv_bytes().await?;
        serde_json::from_slice(&bytes).map_err(ChannelError::Decode)
    }

    /// Returns the most recent unread message if one is buffered.
    ///
    /// # Returns
    ///
    /// * `Ok(None)` if nothing new arrived since the last receive.
    /// * `Err` if transport fails or deserialization error occurs.
    pub async fn try_recv(&mut self) -> Result<Option<C>, ChannelError> {
        match self.transport.try_recv().await? {
            Some(bytes) => serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(ChannelError::Decode),
            None => Ok(None),
        }
    }
}

/// A strongly-typed broadcast socket.
pub struct SenderSocket<C> {
    transport: Box<dyn TransportOutput>,
    _marker: PhantomData<C>,
}

impl<C> SenderSocket<C>
where
    C: Serialize,
{
    /// Creates a new SenderSocket from a raw transport backend.
    ///
    /// # Arguments
    ///
    /// * `transport` - The underlying transport implementation.
    pub fn new(transport: Box<dyn TransportOutput>) -> Self {
        Self {
            transport,
            _marker: PhantomData,
        }
    }

    /// Serializes and broadcasts the message.
    ///
    /// # Returns
    ///
    /// * `Ok(())` on success.
    /// * `Err` if serialization or transport fails.
    pub async fn send(&self, data: &C) -> Result<(), ChannelError> {
        let bytes = serde_json::to_vec(data).map_err(ChannelError::Encode)?;
        self.transport.send_bytes(&bytes).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comms::transports::memory::{MemoryTransportInput, MemoryTransportOutput};
    use trading::{PriceTick, Snapshot};

    #[tokio::test]
    async fn test_typed_socket_memory() -> anyhow::Result<()> {
        // 1. Setup Memory Transport
        let output_transport = MemoryTransportOutput::new("typed-socket")?;
        let input_transport = MemoryTransportInput::new("typed-socket")?;

        // 2. Wrap in Typed Sockets
        let output: SenderSocket<Snapshot> = SenderSocket::new(Box::new(output_transport));
        let mut input: ReceiverSocket<Snapshot> = ReceiverSocket::new(Box::new(input_transport));

        // 3. Create Typed Data
        let snapshot: Snapshot = vec![PriceTick::new("AAPL", 150.0, 1000.0)]
            .into_iter()
            .collect();

        // 4. Send
        output.send(&snapshot).await?;

        // 5. Receive & Verify
        let received = input.recv().await?;
        assert_eq!(received.get_count(), 1);
        assert_eq!(received.get("AAPL").unwrap().get_price(), 150.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_decode_failure_is_reported() -> anyhow::Result<()> {
        let output = MemoryTransportOutput::new("typed-socket-garbage")?;
        let mut input: ReceiverSocket<PriceTick> =
            ReceiverSocket::new(Box::new(MemoryTransportInput::new("typed-socket-garbage")?));

        output.send_bytes(b"not json").await?;

        assert!(matches!(input.recv().await, Err(ChannelError::Decode(_))));
        Ok(())
    }
}
