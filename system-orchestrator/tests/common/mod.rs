use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use system_orchestrator::SystemConfig;

/// Writes an executable shell script standing in for a worker binary.
pub fn write_worker(dir: &Path, binary: &str, body: &str) {
    let path = dir.join(binary);
    std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
}

pub fn config_for(dir: &Path) -> SystemConfig {
    SystemConfig {
        bin_dir: Some(dir.display().to_string()),
        supervise_interval_ms: 20,
        terminate_grace_ms: 300,
        ..SystemConfig::default()
    }
}
