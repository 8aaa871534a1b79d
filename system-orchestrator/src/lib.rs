//! Process orchestration for the price pipeline.
//!
//! All ports are handed out before any worker starts. Once running, the
//! death of any single worker tears the whole pipeline down.

pub mod config;
pub mod error;
pub mod process;

pub use config::SystemConfig;
pub use error::OrchestratorError;
pub use process::manager::{ProcessManager, SupervisionEnd};
