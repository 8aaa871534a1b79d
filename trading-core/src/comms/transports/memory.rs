use crate::comms::error::ChannelError;
use crate::comms::transport::{TransportInput, TransportOutput};
use async_trait::async_trait;
use lazy_static::lazy_static;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

type Slot = Option<Arc<Vec<u8>>>;

lazy_static! {
    /// Named latest-value cells shared by every memory endpoint in the process.
    static ref CHANNELS: Mutex<HashMap<String, Arc<watch::Sender<Slot>>>> =
        Mutex::new(HashMap::new());
}

/// Returns the cell for `name`, creating it on first use. Either side may
/// arrive first, mirroring ZMQ where a subscriber may connect before the
/// publisher binds.
fn channel(name: &str) -> Result<Arc<watch::Sender<Slot>>, ChannelError> {
    let mut channels = CHANNELS
        .lock()
        .map_err(|_| ChannelError::Closed(name.to_string()))?;
    let sender = channels
        .entry(name.to_string())
        .or_insert_with(|| Arc::new(watch::channel(None).0));
    Ok(sender.clone())
}

/// In-process conflating input backed by a `watch` cell.
pub(crate) struct MemoryTransportInput {
    name: String,
    receiver: watch::Receiver<Slot>,
}

impl MemoryTransportInput {
    /// Subscribes to the named channel. Values published before this call are
    /// not delivered, like a late-joining ZMQ subscriber.
    pub fn new(name: &str) -> Result<Self, ChannelError> {
        let sender = channel(name)?;
        Ok(Self {
            name: name.to_string(),
            receiver: sender.subscribe(),
        })
    }
}

#[async_trait]
impl TransportInput for MemoryTransportInput {
    async fn recv_bytes(&mut self) -> Result<Vec<u8>, ChannelError> {
        loop {
            self.receiver
                .changed()
                .await
                .map_err(|_| ChannelError::Closed(self.name.clone()))?;
            let latest = self.receiver.borrow_and_update().clone();
            if let Some(data) = latest {
                return Ok(data.as_ref().clone());
            }
        }
    }

    async fn try_recv(&mut self) -> Result<Option<Vec<u8>>, ChannelError> {
        let changed = self
            .receiver
            .has_changed()
            .map_err(|_| ChannelError::Closed(self.name.clone()))?;
        if !changed {
            return Ok(None);
        }
        let latest = self.receiver.borrow_and_update().clone();
        Ok(latest.map(|data| data.as_ref().clone()))
    }
}

/// In-process output that overwrites the named cell on every send.
pub(crate) struct MemoryTransportOutput {
    sender: Arc<watch::Sender<Slot>>,
}

impl MemoryTransportOutput {
    pub fn new(name: &str) -> Result<Self, ChannelError> {
        Ok(Self {
            sender: channel(name)?,
        })
    }
}

#[async_trait]
impl TransportOutput for MemoryTransportOutput {
    async fn send_bytes(&self, data: &[u8]) -> Result<(), ChannelError> {
        self.sender.send_replace(Some(Arc::new(data.to_vec())));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test]
    async fn reader_behind_sees_only_the_latest_value() {
        let output = MemoryTransportOutput::new("memory-latest").unwrap();
        let mut input = MemoryTransportInput::new("memory-latest").unwrap();

        for i in 0..10u8 {
            output.send_bytes(&[i]).await.unwrap();
        }

        assert_eq!(input.recv_bytes().await.unwrap(), vec![9]);
        // Nothing newer yet: the next receive waits.
        assert!(timeout(Duration::from_millis(50), input.recv_bytes())
            .await
            .is_err());
    }

    #[tokio::test]
    async fn first_receive_waits_for_first_publication() {
        let mut input = MemoryTransportInput::new("memory-first").unwrap();
        assert!(timeout(Duration::from_millis(50), input.recv_bytes())
            .await
            .is_err());

        let output = MemoryTransportOutput::new("memory-first").unwrap();
        output.send_bytes(b"hello").await.unwrap();
        assert_eq!(input.recv_bytes().await.unwrap(), b"hello".to_vec());
    }

    #[tokio::test]
    async fn try_recv_never_waits() {
        let output = MemoryTransportOutput::new("memory-try").unwrap();
        let mut input = MemoryTransportInput::new("memory-try").unwrap();
        assert_eq!(input.try_recv().await.unwrap(), None);

        output.send_bytes(b"a").await.unwrap();
        output.send_bytes(b"b").await.unwrap();
        assert_eq!(input.try_recv().await.unwrap(), Some(b"b".to_vec()));
        assert_eq!(input.try_recv().await.unwrap(), None);
    }

    #[tokio::test]
    async fn late_subscriber_does_not_see_old_values() {
        let output = MemoryTransportOutput::new("memory-late").unwrap();
        output.send_bytes(b"old").await.unwrap();

        let mut input = MemoryTransportInput::new("memory-late").unwrap();
        output.send_bytes(b"new").await.unwrap();
        assert_eq!(input.recv_bytes().await.unwrap(), b"new".to_vec());
    }
}
