//! Transaction scopes.

use super::handle::Txn;
use crate::error::{StoreError, StoreResult};

/// The error slot of a scope.
///
/// Operations record failures here; [`Scope::finalize`] reads it to choose
/// between commit and rollback. The first recorded error wins.
#[derive(Debug, Default)]
pub struct ScopeResult {
    error: Option<StoreError>,
}

impl ScopeResult {
    /// Records `err` unless an error is already present.
    ///
    /// Returns whether `err` was recorded.
    pub fn record(&mut self, err: StoreError) -> bool {
        if self.error.is_some() {
            tracing::debug!(error = %err, "scope already failed; error not recorded");
            return false;
        }
        self.error = Some(err);
        true
    }

    /// Returns true if no error was recorded.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Returns the recorded error.
    #[must_use]
    pub fn error(&self) -> Option<&StoreError> {
        self.error.as_ref()
    }

    fn take(&mut self) -> Option<StoreError> {
        self.error.take()
    }
}

/// One atomic graph transaction, from open to commit or rollback.
///
/// A scope is obtained from [`crate::Store::open_scope`] and must end with
/// [`Scope::finalize`] or [`Scope::abort`]; both consume it, so a scope can
/// only be finalized once. A scope dropped without finalizing (early
/// return, `?`, unwinding) is rolled back and never committed.
///
/// Most callers should use [`crate::Store::transact`] instead.
///
/// # Example
///
/// ```rust
/// use dgql_graph::{MemoryGraph, Mutation};
/// use dgql_store::{Context, Store};
/// use serde_json::json;
///
/// let graph = MemoryGraph::new();
/// let store = Store::new(graph.clone());
///
/// let mut scope = store.open_scope(&Context::new()).unwrap();
/// if let Err(err) = scope.txn().mutate(&Mutation::set(json!({"Note.text": "hi"}))) {
///     scope.record(err);
/// }
/// scope.finalize().unwrap();
/// assert_eq!(graph.node_count(), 1);
/// ```
pub struct Scope {
    id: u64,
    txn: Txn,
    result: ScopeResult,
    finalized: bool,
}

impl Scope {
    pub(crate) fn new(id: u64, txn: Txn) -> Self {
        Self {
            id,
            txn,
            result: ScopeResult::default(),
            finalized: false,
        }
    }

    /// Returns the scope's sequence number, used in logs.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Returns the transaction handle.
    pub fn txn(&mut self) -> &mut Txn {
        &mut self.txn
    }

    /// Records an error; the scope will roll back.
    pub fn record(&mut self, err: StoreError) {
        self.result.record(err);
    }

    /// Returns the error slot.
    #[must_use]
    pub fn result(&self) -> &ScopeResult {
        &self.result
    }

    /// Runs one step against the handle, recording its error.
    ///
    /// Steps are skipped once the scope has failed.
    pub fn run<T>(&mut self, step: impl FnOnce(&mut Txn) -> StoreResult<T>) -> Option<T> {
        if !self.result.is_ok() {
            return None;
        }
        match step(&mut self.txn) {
            Ok(value) => Some(value),
            Err(err) => {
                self.result.record(err);
                None
            }
        }
    }

    /// Ends the scope.
    ///
    /// Commits if no error was recorded; otherwise rolls back and returns
    /// the recorded error.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Commit`] if the commit failed; the writes are lost
    /// - the recorded error if the rollback succeeded
    /// - [`StoreError::Rollback`] wrapping the recorded error if the
    ///   rollback failed too
    pub fn finalize(mut self) -> StoreResult<()> {
        self.finalized = true;
        match self.result.take() {
            None => self.commit(),
            Some(original) => Err(self.rollback(original)),
        }
    }

    /// Records `err` and ends the scope with a rollback.
    ///
    /// Returns the final error: the first recorded error, or
    /// [`StoreError::Rollback`] wrapping it if the rollback failed.
    #[must_use]
    pub fn abort(mut self, err: StoreError) -> StoreError {
        self.finalized = true;
        let original = self.result.take().unwrap_or(err);
        self.rollback(original)
    }

    fn commit(&mut self) -> StoreResult<()> {
        match self.txn.commit() {
            Ok(()) => {
                tracing::debug!(scope = self.id, "scope committed");
                Ok(())
            }
            Err(source) => {
                tracing::warn!(scope = self.id, error = %source, "scope commit failed");
                Err(StoreError::Commit(source))
            }
        }
    }

    fn rollback(&mut self, original: StoreError) -> StoreError {
        match self.txn.discard() {
            Ok(()) => {
                tracing::debug!(scope = self.id, error = %original, "scope rolled back");
                original
            }
            Err(source) => {
                let err = StoreError::Rollback {
                    source,
                    original: Box::new(original),
                };
                tracing::error!(scope = self.id, error = %err, "scope rollback failed");
                err
            }
        }
    }
}

impl Drop for Scope {
    fn drop(&mut self) {
        if self.finalized {
            return;
        }
        self.finalized = true;
        tracing::warn!(scope = self.id, "scope dropped without finalize; rolling back");
        if let Err(err) = self.txn.discard() {
            tracing::error!(scope = self.id, error = %err, "rollback of dropped scope failed");
        }
    }
}

impl std::fmt::Debug for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scope")
            .field("id", &self.id)
            .field("result", &self.result)
            .field("finalized", &self.finalized)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Context;
    use dgql_graph::{FaultPoint, GraphError, MemoryGraph, Mutation};
    use serde_json::json;

    fn scope(graph: &MemoryGraph) -> Scope {
        Scope::new(1, Txn::new(Box::new(graph.begin()), Context::new()))
    }

    fn write(txn: &mut Txn) -> StoreResult<()> {
        txn.mutate(&Mutation::set(json!({"Note.text": "x"}))).map(|_| ())
    }

    #[test]
    fn first_recorded_error_wins() {
        let mut result = ScopeResult::default();
        assert!(result.record(StoreError::Canceled));
        assert!(!result.record(StoreError::ConnectionInactive));
        assert!(matches!(result.error(), Some(StoreError::Canceled)));
    }

    #[test]
    fn finalize_commits_clean_scope() {
        let graph = MemoryGraph::new();
        let mut scope = scope(&graph);
        assert_eq!(scope.run(write), Some(()));
        scope.finalize().unwrap();

        let stats = graph.stats();
        assert_eq!((stats.commits, stats.discards), (1, 0));
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn finalize_rolls_back_failed_scope() {
        let graph = MemoryGraph::new();
        let mut scope = scope(&graph);
        scope.run(write);
        scope.record(StoreError::not_found("user", "u"));
        // later steps are skipped
        assert_eq!(scope.run(write), None);

        let err = scope.finalize().unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
        let stats = graph.stats();
        assert_eq!((stats.commits, stats.discards), (0, 1));
        assert_eq!(graph.node_count(), 0);
    }

    #[test]
    fn commit_failure_is_reported() {
        let graph = MemoryGraph::new();
        graph.faults().fail_next(FaultPoint::Commit);
        let mut scope = scope(&graph);
        scope.run(write);

        let err = scope.finalize().unwrap_err();
        assert!(matches!(err, StoreError::Commit(GraphError::Injected("commit"))));
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.stats().discards, 0);
    }

    #[test]
    fn rollback_failure_wraps_original() {
        let graph = MemoryGraph::new();
        graph.faults().fail_next(FaultPoint::Discard);
        let scope = scope(&graph);

        let err = scope.abort(StoreError::Canceled);
        let message = err.to_string();
        assert!(message.contains("rollback failed after: operation canceled"));
        assert!(message.contains("injected discard failure"));
        assert!(matches!(err.root(), StoreError::Canceled));
    }

    #[test]
    fn abort_keeps_first_recorded_error() {
        let graph = MemoryGraph::new();
        let mut scope = scope(&graph);
        scope.record(StoreError::Canceled);
        let err = scope.abort(StoreError::ConnectionInactive);
        assert!(matches!(err, StoreError::Canceled));
    }

    #[test]
    fn drop_rolls_back_and_never_commits() {
        let graph = MemoryGraph::new();
        {
            let mut scope = scope(&graph);
            scope.run(write);
        }
        let stats = graph.stats();
        assert_eq!((stats.commits, stats.discards, stats.abandoned), (0, 1, 0));
        assert_eq!(graph.node_count(), 0);
    }

    #[test]
    fn drop_after_finalize_is_noop() {
        let graph = MemoryGraph::new();
        scope(&graph).finalize().unwrap();
        let stats = graph.stats();
        assert_eq!(stats.finished(), 1);
    }
}
