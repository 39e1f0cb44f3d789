// src/engine/mod.rs

//! Build engine: one worker per graph node plus the controller that starts
//! them and reconciles the run into a single outcome.
//!
//! - [`worker`] implements the leaf and target protocols: decide whether a
//!   file must be rebuilt, build it at most once, and propagate its
//!   completion time to dependents.
//! - [`controller`] builds the graph, launches the workers, watches for the
//!   first build error, broadcasts cancellation, and reports the result.

use thiserror::Error;

/// Canonical file name type used throughout the engine.
pub type FileName = String;

/// A build action that failed, fatal for the whole run.
#[derive(Debug, Error)]
#[error("build error on file '{filename}': {source}")]
pub struct BuildError {
    pub filename: FileName,
    pub source: anyhow::Error,
}

/// The single message a controller delivers for a run.
#[derive(Debug)]
pub enum BuildMsg {
    Success,
    Failed(BuildError),
}

impl BuildMsg {
    pub fn is_success(&self) -> bool {
        matches!(self, BuildMsg::Success)
    }

    /// Convert into a `Result`, carrying the build error on failure.
    pub fn into_result(self) -> Result<(), BuildError> {
        match self {
            BuildMsg::Success => Ok(()),
            BuildMsg::Failed(err) => Err(err),
        }
    }
}

/// Tuning knobs for a controller run.
#[derive(Debug, Clone, Copy)]
pub struct ControllerOptions {
    /// Number of launcher tasks used to start the workers.
    ///
    /// Only affects how quickly workers start, never the outcome.
    pub launchers: usize,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        let launchers = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self { launchers }
    }
}

pub mod controller;
pub mod worker;

pub use controller::make_controller;
