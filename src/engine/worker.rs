// src/engine/worker.rs

//! Per-node worker protocols.
//!
//! Leaf: check cancellation, stat the file, build it if missing, propagate.
//!
//! Target: stat the file once, then consume exactly `dependency_count`
//! completion signals. The first dependency that is not strictly older than
//! the target makes it stale (equal times count as stale); the remaining
//! signals are still drained before the single build. A missing target is
//! stale from the start. A target that outlives all of its dependencies
//! propagates its own modification time without building.

use std::sync::Arc;
use std::time::SystemTime;

use anyhow::Context;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::dag::{Mailbox, NodeKind, NodeMap, NodeTask};
use crate::engine::BuildError;
use crate::scan::Scan;

/// State shared by every worker of one run.
#[derive(Debug)]
pub struct WorkerContext {
    nodes: Arc<NodeMap>,
    scan: Arc<dyn Scan>,
    errors: mpsc::Sender<BuildError>,
}

impl WorkerContext {
    pub fn new(nodes: Arc<NodeMap>, scan: Arc<dyn Scan>, errors: mpsc::Sender<BuildError>) -> Self {
        Self {
            nodes,
            scan,
            errors,
        }
    }

    /// Modification time of `filename`, or `None` if it must be built.
    async fn status(&self, filename: &str) -> Option<SystemTime> {
        let scan = Arc::clone(&self.scan);
        let name = filename.to_string();
        let result = tokio::task::spawn_blocking(move || scan.status(&name))
            .await
            .context("status call panicked")
            .and_then(|res| res);

        match result {
            Ok(time) => Some(time),
            Err(err) => {
                debug!(file = %filename, error = %err, "status unavailable; treating as missing");
                None
            }
        }
    }

    /// Build `filename`; on failure report to the controller and return
    /// `None`.
    async fn build(&self, filename: &str) -> Option<SystemTime> {
        let scan = Arc::clone(&self.scan);
        let name = filename.to_string();
        let result = tokio::task::spawn_blocking(move || scan.build(&name))
            .await
            .context("build call panicked")
            .and_then(|res| res);

        match result {
            Ok(time) => {
                info!(file = %filename, "built");
                Some(time)
            }
            Err(source) => {
                warn!(file = %filename, error = %source, "build failed");
                let err = BuildError {
                    filename: filename.to_string(),
                    source,
                };
                // Capacity covers one error per worker, so this never waits.
                if self.errors.try_send(err).is_err() {
                    debug!(file = %filename, "error channel closed; another failure was already recorded");
                }
                None
            }
        }
    }

    async fn build_and_propagate(&self, filename: &str) {
        if let Some(time) = self.build(filename).await {
            self.propagate(filename, time).await;
        }
    }

    /// Deliver `time` to every dependent of `filename`.
    async fn propagate(&self, filename: &str, time: SystemTime) {
        let Some(node) = self.nodes.get(filename) else {
            warn!(file = %filename, "node missing from graph; nothing to propagate");
            return;
        };

        for dependent in node.dependents() {
            match self.nodes.get(dependent) {
                Some(dep) => {
                    if !dep.deliver(time).await {
                        debug!(file = %filename, dependent = %dependent, "dependent no longer listening");
                    }
                }
                None => warn!(file = %filename, dependent = %dependent, "unknown dependent"),
            }
        }

        debug!(file = %filename, dependents = ?node.dependents(), "propagated completion time");
    }
}

/// Run the worker matching the task's node kind.
pub async fn run_node(ctx: Arc<WorkerContext>, task: NodeTask) {
    match task.kind {
        NodeKind::Leaf => leaf_worker(&ctx, &task.filename, task.mailbox).await,
        NodeKind::Target => {
            target_worker(&ctx, &task.filename, task.dependency_count, task.mailbox).await
        }
    }
}

pub async fn leaf_worker(ctx: &WorkerContext, filename: &str, mut mailbox: Mailbox) {
    if mailbox.is_cancelled() {
        debug!(file = %filename, "cancelled before start");
        return;
    }

    match ctx.status(filename).await {
        Some(time) => ctx.propagate(filename, time).await,
        None => {
            info!(file = %filename, "missing; building");
            ctx.build_and_propagate(filename).await;
        }
    }
}

pub async fn target_worker(
    ctx: &WorkerContext,
    filename: &str,
    dependency_count: usize,
    mut mailbox: Mailbox,
) {
    if mailbox.is_cancelled() {
        debug!(file = %filename, "cancelled before start");
        return;
    }

    let Some(self_time) = ctx.status(filename).await else {
        info!(file = %filename, "missing; building once dependencies resolve");
        if mailbox.drain(dependency_count).await {
            ctx.build_and_propagate(filename).await;
        } else {
            debug!(file = %filename, "cancelled while waiting for dependencies");
        }
        return;
    };

    let mut remaining = dependency_count;
    while remaining > 0 {
        let Some(dep_time) = mailbox.next_signal().await else {
            debug!(file = %filename, "cancelled while waiting for dependencies");
            return;
        };
        remaining -= 1;

        if self_time > dep_time {
            continue;
        }

        info!(file = %filename, remaining, "stale; building once dependencies resolve");
        if mailbox.drain(remaining).await {
            ctx.build_and_propagate(filename).await;
        } else {
            debug!(file = %filename, "cancelled while waiting for dependencies");
        }
        return;
    }

    debug!(file = %filename, "up to date");
    ctx.propagate(filename, self_time).await;
}
