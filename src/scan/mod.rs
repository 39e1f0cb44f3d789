// src/scan/mod.rs

//! The Scan collaborator: file status and build execution.
//!
//! Workers only ever talk to a [`Scan`]; production uses [`FileScan`] over
//! the real filesystem, and tests substitute in-memory or scripted fakes.

use std::fmt::Debug;
use std::time::SystemTime;

use anyhow::Result;

pub mod file_scan;

pub use file_scan::FileScan;

/// File status and build operations consumed by the scheduler.
///
/// Both calls are synchronous; workers run them on Tokio's blocking pool.
pub trait Scan: Send + Sync + Debug {
    /// Modification time of `filename`.
    ///
    /// An error means the file does not exist (or cannot be inspected),
    /// which the scheduler treats as "stale, must build".
    fn status(&self, filename: &str) -> Result<SystemTime>;

    /// Build `filename` and return its resulting timestamp.
    fn build(&self, filename: &str) -> Result<SystemTime>;
}
