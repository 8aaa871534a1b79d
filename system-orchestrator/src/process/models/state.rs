use super::port_allocator::Port;
use super::role::WorkerRole;
use tokio::process::Child;

/// A started worker. Owned by the process manager until termination.
#[derive(Debug)]
pub struct ProcessHandle {
    pub name: String,
    pub role: WorkerRole,
    pub port: Option<Port>,
    pub pid: Option<u32>,
    pub child: Child,
}

impl ProcessHandle {
    pub fn new(name: String, role: WorkerRole, port: Option<Port>, child: Child) -> Self {
        let pid = child.id();
        Self {
            name,
            role,
            port,
            pid,
            child,
        }
    }
}
