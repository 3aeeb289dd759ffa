//! Shared utilities for the tessera workspace.

pub mod log_setup;

pub use log_setup::{setup_logging, LogConfig, LogSetupError};
