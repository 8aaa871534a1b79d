//! # Trading Core Library
//!
//! Shared plumbing for every worker process of the price pipeline.
//!
//! ## Modules
//! - `comms`: Latest-value-only (conflating) publish/subscribe channels over ZMQ or memory.
//! - `args`: Standardized endpoint arguments shared by all workers.
//! - `framework`: Process lifecycle helpers (shutdown signal handling).

pub mod args;
pub mod comms;
pub mod framework;
