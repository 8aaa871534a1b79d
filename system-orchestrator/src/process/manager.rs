use log::{debug, error, info, warn};
use std::future::Future;
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::process::Command;

use super::models::config::ProcessConfig;
use super::models::port_allocator::{Port, PortAllocator};
use super::models::role::WorkerRole;
use super::models::state::ProcessHandle;
use crate::config::SystemConfig;
use crate::error::OrchestratorError;

/// Index of a planned worker, returned by allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerId(usize);

/// Why supervision stopped.
#[derive(Debug)]
pub enum SupervisionEnd {
    WorkerExited { name: String, status: ExitStatus },
    Interrupted,
    NothingRunning,
}

impl SupervisionEnd {
    /// True when a worker died with a failure status.
    pub fn is_failure(&self) -> bool {
        matches!(self, SupervisionEnd::WorkerExited { status, .. } if !status.success())
    }
}

/// Owns the port allocator and every worker process of one run.
pub struct ProcessManager {
    ports: PortAllocator,
    bin_dir: PathBuf,
    planned: Vec<ProcessConfig>,
    running: Vec<ProcessHandle>,
    supervise_interval: Duration,
    terminate_grace: Duration,
}

impl ProcessManager {
    pub fn new(config: &SystemConfig) -> Result<Self, OrchestratorError> {
        Ok(Self {
            ports: PortAllocator::new(config.initial_port, config.max_port)?,
            bin_dir: config.resolve_bin_dir()?,
            planned: Vec::new(),
            running: Vec::new(),
            supervise_interval: config.supervise_interval(),
            terminate_grace: config.terminate_grace(),
        })
    }

    // --- Planning ---

    /// Reserves a worker slot, and a port when the worker publishes.
    ///
    /// Nothing is started here. Exhausting the port range fails the call
    /// and leaves no slot behind.
    pub fn allocate(
        &mut self,
        name: impl Into<String>,
        role: WorkerRole,
        needs_port: bool,
    ) -> Result<(WorkerId, Option<Port>), OrchestratorError> {
        let port = if needs_port {
            Some(self.ports.allocate()?)
        } else {
            None
        };
        Ok((self.plan(name.into(), role, port), port))
    }

    /// Like [`ProcessManager::allocate`] for a worker that always publishes.
    pub fn allocate_with_port(
        &mut self,
        name: impl Into<String>,
        role: WorkerRole,
    ) -> Result<(WorkerId, Port), OrchestratorError> {
        let port = self.ports.allocate()?;
        Ok((self.plan(name.into(), role, Some(port)), port))
    }

    fn plan(&mut self, name: String, role: WorkerRole, port: Option<Port>) -> WorkerId {
        let program = self.bin_dir.join(role.binary_name());
        debug!(
            "Planned [{}] as {} (port {:?}, {} ports left)",
            name,
            role,
            port,
            self.ports.remaining()
        );
        self.planned.push(ProcessConfig::new(name, role, program, port));
        WorkerId(self.planned.len() - 1)
    }

    pub fn configure(&mut self, id: WorkerId, args: Vec<String>) -> Result<(), OrchestratorError> {
        let config = self
            .planned
            .get_mut(id.0)
            .ok_or(OrchestratorError::UnknownWorker(id.0))?;
        config.set_args(args);
        Ok(())
    }

    pub fn planned(&self) -> &[ProcessConfig] {
        &self.planned
    }

    pub fn running_count(&self) -> usize {
        self.running.len()
    }

    // --- Runtime Lifecycle ---

    /// Starts every planned worker in planning order.
    ///
    /// If one fails to spawn, the ones already started are terminated before
    /// the error is returned.
    pub async fn start_all(&mut self) -> Result<(), OrchestratorError> {
        let planned = std::mem::take(&mut self.planned);
        for config in planned {
            if let Err(e) = self.spawn(&config) {
                error!("{}", e);
                self.terminate_all().await;
                return Err(e);
            }
        }
        info!("Started {} workers.", self.running.len());
        Ok(())
    }

    fn spawn(&mut self, config: &ProcessConfig) -> Result<(), OrchestratorError> {
        info!(
            "Spawning [{}]: {} {:?}",
            config.name(),
            config.program().display(),
            config.args()
        );

        let child = Command::new(config.program())
            .args(config.args())
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| OrchestratorError::Spawn {
                name: config.name().to_string(),
                program: config.program().display().to_string(),
                source,
            })?;

        let handle = ProcessHandle::new(
            config.name().to_string(),
            config.role(),
            config.port(),
            child,
        );
        info!("[{}] started (PID: {:?})", handle.name, handle.pid);
        self.running.push(handle);
        Ok(())
    }

    /// Polls worker liveness until one exits or Ctrl-C arrives.
    pub async fn supervise_until_exit(&mut self) -> Result<SupervisionEnd, OrchestratorError> {
        self.supervise_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Unable to listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    /// Polls worker liveness until one exits or `interrupt` resolves.
    pub async fn supervise_until<F>(
        &mut self,
        interrupt: F,
    ) -> Result<SupervisionEnd, OrchestratorError>
    where
        F: Future<Output = ()>,
    {
        if self.running.is_empty() {
            return Ok(SupervisionEnd::NothingRunning);
        }
        info!("Supervising {} workers.", self.running.len());

        tokio::pin!(interrupt);
        let mut ticker = tokio::time::interval(self.supervise_interval);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Some(end) = self.first_exited()? {
                        return Ok(end);
                    }
                }
                _ = &mut interrupt => {
                    info!("Interrupted, shutting down.");
                    return Ok(SupervisionEnd::Interrupted);
                }
            }
        }
    }

    fn first_exited(&mut self) -> Result<Option<SupervisionEnd>, OrchestratorError> {
        for handle in self.running.iter_mut() {
            if let Some(status) = handle.child.try_wait()? {
                warn!("Process [{}] exited with: {}", handle.name, status);
                return Ok(Some(SupervisionEnd::WorkerExited {
                    name: handle.name.clone(),
                    status,
                }));
            }
        }
        Ok(None)
    }

    /// Asks every live worker to stop, waits for each, and force-kills any
    /// that outlive the grace period.
    pub async fn terminate_all(&mut self) {
        for mut handle in self.running.drain(..) {
            match handle.child.try_wait() {
                Ok(Some(status)) => {
                    debug!("[{}] already exited: {}", handle.name, status);
                    continue;
                }
                Ok(None) => {}
                Err(e) => warn!("Error attempting to wait on [{}]: {}", handle.name, e),
            }

            request_stop(&mut handle);
            match tokio::time::timeout(self.terminate_grace, handle.child.wait()).await {
                Ok(Ok(status)) => info!("[{}] stopped: {}", handle.name, status),
                Ok(Err(e)) => warn!("Error waiting for [{}]: {}", handle.name, e),
                Err(_) => {
                    warn!(
                        "[{}] still running after {:?}, killing",
                        handle.name, self.terminate_grace
                    );
                    if let Err(e) = handle.child.kill().await {
                        error!("Failed to kill [{}]: {}", handle.name, e);
                    }
                }
            }
        }
        info!("Processes terminated.");
    }
}

#[cfg(unix)]
fn request_stop(handle: &mut ProcessHandle) {
    if let Some(pid) = handle.pid {
        let rc = unsafe { libc::kill(pid as libc::pid_t, libc::SIGTERM) };
        if rc != 0 {
            warn!(
                "SIGTERM to [{}] (PID {}) failed: {}",
                handle.name,
                pid,
                std::io::Error::last_os_error()
            );
        }
    }
}

#[cfg(not(unix))]
fn request_stop(handle: &mut ProcessHandle) {
    if let Err(e) = handle.child.start_kill() {
        warn!("Failed to stop [{}]: {}", handle.name, e);
    }
}
