// src/dag/node.rs

//! Frozen graph nodes and the per-worker receiving half of their channels.

use std::collections::HashMap;
use std::time::SystemTime;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;

use crate::engine::FileName;

/// Read-only lookup shared by every worker of a run.
pub type NodeMap = HashMap<FileName, Node>;

/// Whether a node has declared dependencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// No declared dependencies.
    Leaf,
    /// One or more declared dependencies.
    Target,
}

/// One file in a frozen dependency graph.
///
/// Only the sending halves live here: dependencies push completion times into
/// `inbox`, and the error watcher pushes into `cancel`. The receiving halves
/// belong to the node's own worker (see [`Mailbox`]).
#[derive(Debug)]
pub struct Node {
    filename: FileName,
    dependency_count: usize,
    dependents: Vec<FileName>,
    inbox: mpsc::Sender<SystemTime>,
    cancel: mpsc::Sender<()>,
}

impl Node {
    pub(crate) fn new(
        filename: FileName,
        dependency_count: usize,
        dependents: Vec<FileName>,
    ) -> (Self, Mailbox) {
        // mpsc channels need a non-zero capacity; leaves never receive.
        let (inbox_tx, inbox_rx) = mpsc::channel(dependency_count.max(1));
        let (cancel_tx, cancel_rx) = mpsc::channel(1);

        let node = Self {
            filename,
            dependency_count,
            dependents,
            inbox: inbox_tx,
            cancel: cancel_tx,
        };
        let mailbox = Mailbox {
            inbox: inbox_rx,
            cancel: cancel_rx,
        };
        (node, mailbox)
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn dependency_count(&self) -> usize {
        self.dependency_count
    }

    pub fn dependents(&self) -> &[FileName] {
        &self.dependents
    }

    pub fn kind(&self) -> NodeKind {
        if self.dependency_count == 0 {
            NodeKind::Leaf
        } else {
            NodeKind::Target
        }
    }

    /// Deliver a dependency's completion time.
    ///
    /// Returns `false` if the node's worker has already stopped listening.
    pub async fn deliver(&self, time: SystemTime) -> bool {
        self.inbox.send(time).await.is_ok()
    }

    /// Set the cancellation slot without blocking.
    ///
    /// Returns `false` if the slot was already set or the worker is gone.
    pub fn cancel(&self) -> bool {
        self.cancel.try_send(()).is_ok()
    }
}

/// Receiving side of a node's inbox and cancellation slot.
#[derive(Debug)]
pub struct Mailbox {
    inbox: mpsc::Receiver<SystemTime>,
    cancel: mpsc::Receiver<()>,
}

impl Mailbox {
    /// Non-blocking check of the cancellation slot.
    pub fn is_cancelled(&mut self) -> bool {
        matches!(self.cancel.try_recv(), Ok(()) | Err(TryRecvError::Disconnected))
    }

    /// Wait for the next completion time, or `None` once cancelled.
    pub async fn next_signal(&mut self) -> Option<SystemTime> {
        tokio::select! {
            biased;
            Some(()) = self.cancel.recv() => None,
            time = self.inbox.recv() => time,
        }
    }

    /// Consume `count` completion signals, ignoring their values.
    ///
    /// Returns `false` if cancelled before all of them arrived.
    pub async fn drain(&mut self, count: usize) -> bool {
        for _ in 0..count {
            if self.next_signal().await.is_none() {
                return false;
            }
        }
        true
    }
}

/// A node ready to be handed to its worker.
#[derive(Debug)]
pub struct NodeTask {
    pub filename: FileName,
    pub kind: NodeKind,
    pub dependency_count: usize,
    pub mailbox: Mailbox,
}
