use crate::comms::error::ChannelError;
use crate::comms::transport::{TransportInput, TransportOutput};
use async_trait::async_trait;
use log::debug;
use std::sync::Mutex;
use std::time::Duration;
use zmq::{Context as ZmqContext, Socket, SocketType};

/// How long a subscriber yields to the runtime between empty polls.
const POLL_INTERVAL: Duration = Duration::from_millis(1);

/// A thread-safe ZMQ Publisher wrapper.
///
/// Implements `TransportOutput` by wrapping a synchronous `zmq::Socket` in a Mutex.
/// The socket (and its context) is released when the publisher is dropped.
pub(crate) struct ZmqPublisher {
    socket: Mutex<Socket>,
    endpoint: String,
}

impl ZmqPublisher {
    pub fn new(address: &str) -> Result<Self, ChannelError> {
        let context = ZmqContext::new();
        let socket = context.socket(SocketType::PUB)?;
        socket.set_linger(0)?;
        socket.bind(address).map_err(|source| ChannelError::Bind {
            address: address.to_string(),
            source,
        })?;
        Ok(Self {
            socket: Mutex::new(socket),
            endpoint: address.to_string(),
        })
    }
}

#[async_trait]
impl TransportOutput for ZmqPublisher {
    async fn send_bytes(&self, data: &[u8]) -> Result<(), ChannelError> {
        let socket = self
            .socket
            .lock()
            .map_err(|_| ChannelError::Send(format!("{} socket lock poisoned", self.endpoint)))?;
        // PUB never blocks: messages to slow or absent subscribers are dropped.
        socket
            .send(data, 0)
            .map_err(|e| ChannelError::Send(e.to_string()))
    }
}

impl Drop for ZmqPublisher {
    fn drop(&mut self) {
        debug!("Publisher socket on {} closed.", self.endpoint);
    }
}

/// A conflating ZMQ Subscriber wrapper.
///
/// The SUB socket keeps at most one message (`ZMQ_CONFLATE`), so each receive
/// yields the newest message published since the previous receive.
pub(crate) struct ZmqSubscriber {
    socket: Mutex<Socket>,
    endpoint: String,
}

impl ZmqSubscriber {
    pub fn new(address: &str) -> Result<Self, ChannelError> {
        let context = ZmqContext::new();
        let socket = context.socket(SocketType::SUB)?;
        socket.set_linger(0)?;
        // Conflate must be set before connecting to take effect.
        socket.set_conflate(true)?;
        // Subscribe to everything
        socket.set_subscribe(b"")?;
        socket.connect(address).map_err(|source| ChannelError::Connect {
            address: address.to_string(),
            source,
        })?;
        Ok(Self {
            socket: Mutex::new(socket),
            endpoint: address.to_string(),
        })
    }
}

#[async_trait]
impl TransportInput for ZmqSubscriber {
    async fn recv_bytes(&mut self) -> Result<Vec<u8>, ChannelError> {
        loop {
            match self.try_recv().await? {
                Some(data) => return Ok(data),
                // Nothing buffered yet: yield so signals and timers keep running.
                None => tokio::time::sleep(POLL_INTERVAL).await,
            }
        }
    }

    async fn try_recv(&mut self) -> Result<Option<Vec<u8>>, ChannelError> {
        let socket = self
            .socket
            .get_mut()
            .map_err(|_| ChannelError::Recv(format!("{} socket lock poisoned", self.endpoint)))?;
        match socket.recv_bytes(zmq::DONTWAIT) {
            Ok(data) => Ok(Some(data)),
            Err(zmq::Error::EAGAIN) => Ok(None),
            Err(e) => Err(ChannelError::Recv(e.to_string())),
        }
    }
}

impl Drop for ZmqSubscriber {
    fn drop(&mut self) {
        debug!("Subscriber socket to {} closed.", self.endpoint);
    }
}
