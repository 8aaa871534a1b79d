use super::port_allocator::Port;
use super::role::WorkerRole;
use std::path::{Path, PathBuf};

/// How to launch one worker. Built during planning, before anything runs.
#[derive(Debug, Clone)]
pub struct ProcessConfig {
    name: String,
    role: WorkerRole,
    program: PathBuf,
    args: Vec<String>,
    port: Option<Port>,
}

impl ProcessConfig {
    pub fn new(name: String, role: WorkerRole, program: PathBuf, port: Option<Port>) -> Self {
        Self {
            name,
            role,
            program,
            args: Vec::new(),
            port,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> WorkerRole {
        self.role
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn set_args(&mut self, args: Vec<String>) {
        self.args = args;
    }

    pub fn port(&self) -> Option<Port> {
        self.port
    }
}
