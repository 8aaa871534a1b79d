pub mod address;
pub mod builder;
pub mod error;
pub mod socket;
pub mod transport;
pub(crate) mod transports;

pub use address::Address;
pub use builder::{build_publisher, build_subscriber};
pub use error::ChannelError;
pub use socket::{ReceiverSocket, SenderSocket};
