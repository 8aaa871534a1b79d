//! Factory functions for creating communication endpoints.
//!
//! Abstracts the creation of `SenderSocket` and `ReceiverSocket` based on `Address`.

use super::address::Address;
use super::error::ChannelError;
use super::socket::{ReceiverSocket, SenderSocket};
use super::transports::memory::{MemoryTransportInput, MemoryTransportOutput};
use super::transports::zmq::{ZmqPublisher, ZmqSubscriber};
use crate::comms::transport::{TransportInput, TransportOutput};
use serde::{de::DeserializeOwned, Serialize};

/// Factory to create broadcast endpoints.
///
/// # Arguments
///
/// * `address` - The address to bind and publish on.
///
/// # Returns
///
/// * `Ok(SenderSocket)` if successful.
/// * `Err` if binding fails (for example the port is already taken).
pub fn build_publisher<T>(address: &Address) -> Result<SenderSocket<T>, ChannelError>
where
    T: Serialize + Send + Sync + 'static,
{
    let transport: Box<dyn TransportOutput> = match address {
        Address::Zmq(endpoint) => Box::new(ZmqPublisher::new(endpoint)?),
        Address::Memory(name) => Box::new(MemoryTransportOutput::new(name)?),
    };
    Ok(SenderSocket::new(transport))
}

/// Factory to create conflating subscriber endpoints.
///
/// # Arguments
///
/// * `address` - The address to subscribe to.
///
/// # Returns
///
/// * `Ok(ReceiverSocket)` if successful.
/// * `Err` if initialization fails.
pub fn build_subscriber<T>(address: &Address) -> Result<ReceiverSocket<T>, ChannelError>
where
    T: DeserializeOwned + Send + Sync + 'static,
{
    let transport: Box<dyn TransportInput> = match address {
        Address::Zmq(endpoint) => Box::new(ZmqSubscriber::new(endpoint)?),
        Address::Memory(name) => Box::new(MemoryTransportInput::new(name)?),
    };
    Ok(ReceiverSocket::new(transport))
}
