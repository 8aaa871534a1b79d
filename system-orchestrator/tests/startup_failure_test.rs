#![cfg(unix)]

mod common;

use system_orchestrator::process::models::WorkerRole;
use system_orchestrator::{OrchestratorError, ProcessManager};

#[tokio::test]
async fn failed_spawn_terminates_workers_already_started() {
    let dir = tempfile::tempdir().unwrap();
    common::write_worker(dir.path(), "dummy-feed", "exec sleep 30");
    // No aggregator binary in the directory.

    let mut manager = ProcessManager::new(&common::config_for(dir.path())).unwrap();
    manager.allocate_with_port("publisher-AAPL", WorkerRole::Publisher).unwrap();
    manager.allocate_with_port("aggregator", WorkerRole::Aggregator).unwrap();

    let err = manager.start_all().await.unwrap_err();

    match err {
        OrchestratorError::Spawn { name, .. } => assert_eq!(name, "aggregator"),
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(manager.running_count(), 0);
}
