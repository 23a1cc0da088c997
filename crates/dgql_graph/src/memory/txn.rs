//! Transactions of the in-process graph.

use super::faults::FaultPoint;
use super::graph::{rebase, unique_violation, Applier, Nodes, View};
use super::stats::StatsCounters;
use super::Shared;
use crate::backend::{Assigned, GraphTxn, Vars};
use crate::dql;
use crate::error::{GraphError, GraphResult};
use crate::mutation::Mutation;
use std::sync::atomic::Ordering;
use std::sync::Arc;

/// State of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TxnState {
    /// Transaction can run queries and mutations.
    Active,
    /// Transaction has been committed.
    Committed,
    /// Transaction has been discarded, or its commit failed.
    Discarded,
}

/// A transaction against a [`super::MemoryGraph`].
///
/// Writes are staged in the transaction until `commit`. Dropping an active
/// transaction discards its writes and is counted as abandoned in
/// [`super::GraphStats`].
pub struct MemoryTxn {
    shared: Arc<Shared>,
    staged: Nodes,
    /// Committed nodes as they were when first written by this transaction.
    bases: Nodes,
    state: TxnState,
}

impl MemoryTxn {
    pub(crate) fn new(shared: Arc<Shared>) -> Self {
        StatsCounters::bump(&shared.stats.begun);
        Self {
            shared,
            staged: Nodes::new(),
            bases: Nodes::new(),
            state: TxnState::Active,
        }
    }

    /// Checks if the transaction is still active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state == TxnState::Active
    }

    /// Returns the number of nodes with staged writes.
    #[must_use]
    pub fn staged_count(&self) -> usize {
        self.staged.len()
    }

    fn ensure_active(&self) -> GraphResult<()> {
        match self.state {
            TxnState::Active => Ok(()),
            TxnState::Committed => Err(GraphError::Finished("committed")),
            TxnState::Discarded => Err(GraphError::Finished("discarded")),
        }
    }

    fn ensure_connected(&self) -> GraphResult<()> {
        if self.shared.connected.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(GraphError::NotConnected)
        }
    }

    fn run_query(&self, text: &str, vars: &Vars) -> GraphResult<Vec<u8>> {
        self.ensure_active()?;
        self.ensure_connected()?;
        self.shared.faults.trip(FaultPoint::Query)?;

        let query = dql::parse(text)?;
        let nodes = self.shared.nodes.read();
        let result = dql::evaluate(&query, &View::new(&nodes, &self.staged), vars)?;
        serde_json::to_vec(&result).map_err(|e| GraphError::Encode(e.to_string()))
    }
}

impl GraphTxn for MemoryTxn {
    fn query(&mut self, query: &str) -> GraphResult<Vec<u8>> {
        self.run_query(query, &Vars::new())
    }

    fn query_with_vars(&mut self, query: &str, vars: &Vars) -> GraphResult<Vec<u8>> {
        self.run_query(query, vars)
    }

    fn mutate(&mut self, mutation: &Mutation) -> GraphResult<Assigned> {
        self.ensure_active()?;
        self.ensure_connected()?;
        self.shared.faults.trip(FaultPoint::Mutation)?;

        let nodes = self.shared.nodes.read();
        let mut staged = self.staged.clone();
        let mut bases = self.bases.clone();
        let (assigned, touched) =
            Applier::new(&nodes, &mut staged, &mut bases, &self.shared.next_uid)
                .apply(mutation.set_payload())?;
        if let Some(err) = unique_violation(&View::new(&nodes, &staged), &self.shared.unique, touched)
        {
            return Err(err);
        }
        drop(nodes);

        self.staged = staged;
        self.bases = bases;
        Ok(assigned)
    }

    fn commit(&mut self) -> GraphResult<()> {
        self.ensure_active()?;
        StatsCounters::bump(&self.shared.stats.commits);

        // The transaction is over from here on; a failed commit loses its writes.
        self.state = TxnState::Discarded;
        let staged = std::mem::take(&mut self.staged);
        let bases = std::mem::take(&mut self.bases);
        self.ensure_connected()?;
        self.shared.faults.trip(FaultPoint::Commit)?;

        let mut nodes = self.shared.nodes.write();
        let writes = rebase(&nodes, staged, &bases);
        if let Some(err) = unique_violation(
            &View::new(&nodes, &writes),
            &self.shared.unique,
            writes.keys().copied(),
        ) {
            return Err(err);
        }
        let written = writes.len();
        nodes.extend(writes);
        drop(nodes);

        self.state = TxnState::Committed;
        StatsCounters::bump(&self.shared.stats.committed);
        tracing::trace!(written, "memory graph commit");
        Ok(())
    }

    fn discard(&mut self) -> GraphResult<()> {
        if !self.is_active() {
            return Ok(());
        }
        StatsCounters::bump(&self.shared.stats.discards);
        self.state = TxnState::Discarded;
        self.staged.clear();
        self.bases.clear();

        self.ensure_connected()?;
        self.shared.faults.trip(FaultPoint::Discard)
    }
}

impl Drop for MemoryTxn {
    fn drop(&mut self) {
        if self.is_active() {
            StatsCounters::bump(&self.shared.stats.abandoned);
            tracing::warn!(staged = self.staged.len(), "graph transaction dropped while active");
        }
    }
}

impl std::fmt::Debug for MemoryTxn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryTxn")
            .field("state", &self.state)
            .field("staged_count", &self.staged_count())
            .finish_non_exhaustive()
    }
}
