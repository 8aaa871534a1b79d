//! Defines the endpoint arguments shared across all worker processes.
//!
//! Every worker either binds a broadcast channel, connects to one, or both.
//! Flattening `CommonArgs` into each worker's `clap` parser keeps host
//! handling identical across the pipeline.

use crate::comms::Address;
use clap::Args;
use serde::{Deserialize, Serialize};

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
pub struct CommonArgs {
    /// Host that upstream publishers are reachable on
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Interface this worker binds its own publisher on
    #[arg(long, default_value = "*")]
    bind_host: String,
}

impl Default for CommonArgs {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            bind_host: "*".to_string(),
        }
    }
}

impl CommonArgs {
    /// Address to bind a publisher on `port`.
    pub fn publish_address(&self, port: u16) -> Address {
        Address::zmq_tcp(&self.bind_host, port)
    }

    /// Address of an upstream publisher on `port`.
    pub fn connect_address(&self, port: u16) -> Address {
        Address::zmq_tcp(&self.host, port)
    }

    pub fn get_host(&self) -> &str {
        &self.host
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        common: CommonArgs,
    }

    #[test]
    fn defaults_bind_everywhere_and_connect_locally() {
        let args = Harness::parse_from(["worker"]).common;
        assert_eq!(args.publish_address(13140), Address::zmq_tcp("*", 13140));
        assert_eq!(
            args.connect_address(13145),
            Address::zmq_tcp("127.0.0.1", 13145)
        );
    }

    #[test]
    fn host_can_be_overridden() {
        let args = Harness::parse_from(["worker", "--host", "10.0.0.2"]).common;
        assert_eq!(args.get_host(), "10.0.0.2");
    }
}
