pub mod config;
pub mod port_allocator;
pub mod role;
pub mod state;

pub use config::ProcessConfig;
pub use port_allocator::{Port, PortAllocator};
pub use role::WorkerRole;
pub use state::ProcessHandle;
