//! In-process graph backend.

mod faults;
pub(crate) mod graph;
mod stats;
mod txn;

pub use faults::{FaultInjector, FaultPoint};
pub use stats::GraphStats;
pub use txn::MemoryTxn;

use crate::backend::{GraphBackend, GraphTxn};
use graph::Nodes;
use parking_lot::RwLock;
use stats::StatsCounters;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// State shared by a graph and all of its transactions.
pub(crate) struct Shared {
    pub nodes: RwLock<Nodes>,
    pub next_uid: AtomicU64,
    pub connected: AtomicBool,
    pub unique: Vec<String>,
    pub faults: FaultInjector,
    pub stats: StatsCounters,
}

/// An in-process transactional graph.
///
/// This backend keeps all nodes in memory and is suitable for:
/// - Unit and integration tests of the store and resolvers
/// - Embedded use where no external graph database is available
///
/// # Transactions
///
/// Each transaction stages its writes privately and sees the latest
/// committed state overlaid with its own staged writes. `commit` applies
/// the staged writes atomically under a write lock; unique predicates are
/// checked both when a mutation is staged and again at commit.
///
/// # Testing hooks
///
/// [`MemoryGraph::set_connected`] simulates connection loss,
/// [`MemoryGraph::faults`] arms one-shot failures and
/// [`MemoryGraph::stats`] exposes lifecycle counters, including
/// transactions that were dropped without being finished.
///
/// # Example
///
/// ```rust
/// use dgql_graph::{GraphBackend, MemoryGraph};
///
/// let graph = MemoryGraph::builder().unique("User.email").build();
/// let mut txn = graph.new_txn();
/// txn.discard().unwrap();
/// assert_eq!(graph.stats().discards, 1);
/// ```
#[derive(Clone)]
pub struct MemoryGraph {
    shared: Arc<Shared>,
}

impl MemoryGraph {
    /// Creates an empty, connected graph without unique predicates.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Returns a builder for configuring a graph.
    #[must_use]
    pub fn builder() -> MemoryGraphBuilder {
        MemoryGraphBuilder::default()
    }

    /// Starts a transaction with its concrete type.
    #[must_use]
    pub fn begin(&self) -> MemoryTxn {
        MemoryTxn::new(Arc::clone(&self.shared))
    }

    /// Simulates establishing or losing the connection.
    pub fn set_connected(&self, connected: bool) {
        self.shared.connected.store(connected, Ordering::SeqCst);
    }

    /// Returns the fault injector.
    #[must_use]
    pub fn faults(&self) -> &FaultInjector {
        &self.shared.faults
    }

    /// Returns a snapshot of the lifecycle counters.
    #[must_use]
    pub fn stats(&self) -> GraphStats {
        self.shared.stats.snapshot()
    }

    /// Returns the number of committed nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.shared.nodes.read().len()
    }

    /// Returns the unique predicates.
    #[must_use]
    pub fn unique_predicates(&self) -> &[String] {
        &self.shared.unique
    }
}

impl Default for MemoryGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphBackend for MemoryGraph {
    fn is_connected(&self) -> bool {
        self.shared.connected.load(Ordering::SeqCst)
    }

    fn new_txn(&self) -> Box<dyn GraphTxn> {
        Box::new(self.begin())
    }
}

impl std::fmt::Debug for MemoryGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryGraph")
            .field("node_count", &self.node_count())
            .field("connected", &self.is_connected())
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

/// Builder for [`MemoryGraph`].
#[derive(Debug, Clone)]
pub struct MemoryGraphBuilder {
    unique: Vec<String>,
    connected: bool,
}

impl Default for MemoryGraphBuilder {
    fn default() -> Self {
        Self {
            unique: Vec::new(),
            connected: true,
        }
    }
}

impl MemoryGraphBuilder {
    /// Declares a predicate whose values must be unique across nodes.
    #[must_use]
    pub fn unique(mut self, predicate: impl Into<String>) -> Self {
        self.unique.push(predicate.into());
        self
    }

    /// Starts the graph without an established connection.
    #[must_use]
    pub fn disconnected(mut self) -> Self {
        self.connected = false;
        self
    }

    /// Builds the graph.
    #[must_use]
    pub fn build(self) -> MemoryGraph {
        MemoryGraph {
            shared: Arc::new(Shared {
                nodes: RwLock::new(Nodes::new()),
                next_uid: AtomicU64::new(1),
                connected: AtomicBool::new(self.connected),
                unique: self.unique,
                faults: FaultInjector::default(),
                stats: StatsCounters::default(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let graph = MemoryGraph::new();
        assert!(graph.is_connected());
        assert!(graph.unique_predicates().is_empty());
        assert_eq!(graph.node_count(), 0);
    }

    #[test]
    fn builder_options() {
        let graph = MemoryGraph::builder()
            .unique("User.email")
            .disconnected()
            .build();
        assert!(!graph.is_connected());
        assert_eq!(graph.unique_predicates(), ["User.email".to_string()]);

        graph.set_connected(true);
        assert!(graph.is_connected());
    }

    #[test]
    fn clones_share_state() {
        let graph = MemoryGraph::new();
        let other = graph.clone();
        let _txn = graph.begin();
        assert_eq!(other.stats().begun, 1);
    }
}
