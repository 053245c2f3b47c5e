//! Logging initialisation shared by the gvision binaries.
//!
//! Diagnostics always go to standard error so that standard output stays
//! reserved for command results.

pub mod init;

pub use init::{TelemetryConfig, TelemetryError, init_with_config};
