// src/engine/controller.rs

//! Run controller.
//!
//! `make_controller` wires one run together:
//! - builds and freezes the dependency graph
//! - starts one worker per node through a bounded set of launcher tasks
//! - an error watcher records the first build error and sets every node's
//!   cancellation slot
//! - a reconciler waits for all workers and the watcher, then sends exactly
//!   one [`BuildMsg`]

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::dag::{DepGraph, NodeMap, NodeTask};
use crate::engine::worker::{run_node, WorkerContext};
use crate::engine::{BuildError, BuildMsg, ControllerOptions};
use crate::rules::RuleSet;
use crate::scan::Scan;

/// Start a build of `rules` and return the channel that will carry its
/// single outcome.
///
/// Must be called from within a Tokio runtime. The receiver resolves once
/// every worker has finished, with the first build error if any occurred.
/// A cyclic rule set (only constructible with `RuleSet::new_unchecked`)
/// never resolves.
pub fn make_controller(
    rules: &RuleSet,
    scan: Arc<dyn Scan>,
    options: ControllerOptions,
) -> oneshot::Receiver<BuildMsg> {
    let graph = DepGraph::build(rules);
    let total_workers = graph.worker_count();
    info!(
        targets = graph.targets().len(),
        leaves = graph.leaves().len(),
        "starting build"
    );

    let (result_tx, result_rx) = oneshot::channel();
    // One slot per worker: reporting an error never waits on the watcher.
    let (error_tx, error_rx) = mpsc::channel::<BuildError>(total_workers.max(1));

    let (nodes, tasks) = graph.freeze();
    let ctx = Arc::new(WorkerContext::new(Arc::clone(&nodes), scan, error_tx));

    let launchers = spawn_launchers(tasks, ctx, options.launchers);
    let watcher = tokio::spawn(watch_errors(error_rx, nodes));

    tokio::spawn(reconcile(launchers, watcher, result_tx));

    result_rx
}

/// Split `tasks` across at most `launchers` launcher tasks, each of which
/// spawns its share of workers and hands back their join handles.
fn spawn_launchers(
    tasks: Vec<NodeTask>,
    ctx: Arc<WorkerContext>,
    launchers: usize,
) -> Vec<JoinHandle<Vec<JoinHandle<()>>>> {
    if tasks.is_empty() {
        return Vec::new();
    }

    let launchers = launchers.clamp(1, tasks.len());
    let chunk_size = tasks.len().div_ceil(launchers);
    debug!(workers = tasks.len(), launchers, "spawning workers");

    let mut handles = Vec::with_capacity(launchers);
    let mut tasks = tasks.into_iter();
    loop {
        let chunk: Vec<NodeTask> = tasks.by_ref().take(chunk_size).collect();
        if chunk.is_empty() {
            break;
        }
        let ctx = Arc::clone(&ctx);
        handles.push(tokio::spawn(async move {
            chunk
                .into_iter()
                .map(|task| tokio::spawn(run_node(Arc::clone(&ctx), task)))
                .collect::<Vec<_>>()
        }));
    }
    handles
}

/// Wait for the first error, then cancel every node.
///
/// Returns `None` once all workers are gone without reporting an error.
async fn watch_errors(
    mut errors: mpsc::Receiver<BuildError>,
    nodes: Arc<NodeMap>,
) -> Option<BuildError> {
    let err = errors.recv().await?;
    warn!(file = %err.filename, error = %err.source, "build failed; cancelling remaining work");

    let mut cancelled = 0usize;
    for node in nodes.values() {
        if node.cancel() {
            cancelled += 1;
        }
    }
    debug!(cancelled, "cancellation broadcast sent");

    Some(err)
}

async fn reconcile(
    launchers: Vec<JoinHandle<Vec<JoinHandle<()>>>>,
    watcher: JoinHandle<Option<BuildError>>,
    result_tx: oneshot::Sender<BuildMsg>,
) {
    for launcher in launchers {
        let workers = match launcher.await {
            Ok(workers) => workers,
            Err(e) => {
                warn!(error = %e, "launcher task failed");
                continue;
            }
        };
        for worker in workers {
            if let Err(e) = worker.await {
                warn!(error = %e, "worker task failed");
            }
        }
    }

    // Every worker context is dropped by now, so the watcher either holds the
    // first error or sees the error channel close.
    let fatal = match watcher.await {
        Ok(fatal) => fatal,
        Err(e) => {
            warn!(error = %e, "error watcher failed");
            None
        }
    };

    let msg = match fatal {
        Some(err) => BuildMsg::Failed(err),
        None => {
            info!("build finished without errors");
            BuildMsg::Success
        }
    };

    if result_tx.send(msg).is_err() {
        debug!("build result receiver dropped");
    }
}
