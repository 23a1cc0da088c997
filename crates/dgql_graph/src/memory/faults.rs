//! Fault injection for the in-process graph.

use crate::error::{GraphError, GraphResult};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

/// An operation that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultPoint {
    /// `query` / `query_with_vars`.
    Query,
    /// `mutate`.
    Mutation,
    /// `commit`.
    Commit,
    /// `discard`.
    Discard,
}

impl FaultPoint {
    fn name(self) -> &'static str {
        match self {
            FaultPoint::Query => "query",
            FaultPoint::Mutation => "mutation",
            FaultPoint::Commit => "commit",
            FaultPoint::Discard => "discard",
        }
    }
}

impl fmt::Display for FaultPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Pending failures per [`FaultPoint`], shared by all transactions of a graph.
///
/// Each armed failure is consumed by the next call at that point, in
/// whichever transaction reaches it first.
#[derive(Debug, Default)]
pub struct FaultInjector {
    query: AtomicUsize,
    mutation: AtomicUsize,
    commit: AtomicUsize,
    discard: AtomicUsize,
}

impl FaultInjector {
    fn counter(&self, point: FaultPoint) -> &AtomicUsize {
        match point {
            FaultPoint::Query => &self.query,
            FaultPoint::Mutation => &self.mutation,
            FaultPoint::Commit => &self.commit,
            FaultPoint::Discard => &self.discard,
        }
    }

    /// Makes the next call at `point` fail.
    pub fn fail_next(&self, point: FaultPoint) {
        self.fail_times(point, 1);
    }

    /// Makes the next `times` calls at `point` fail.
    pub fn fail_times(&self, point: FaultPoint, times: usize) {
        self.counter(point).fetch_add(times, Ordering::SeqCst);
    }

    /// Returns the number of armed failures at `point`.
    #[must_use]
    pub fn pending(&self, point: FaultPoint) -> usize {
        self.counter(point).load(Ordering::SeqCst)
    }

    /// Disarms every pending failure.
    pub fn clear(&self) {
        for point in [
            FaultPoint::Query,
            FaultPoint::Mutation,
            FaultPoint::Commit,
            FaultPoint::Discard,
        ] {
            self.counter(point).store(0, Ordering::SeqCst);
        }
    }

    /// Consumes one armed failure at `point`, if any.
    pub(crate) fn trip(&self, point: FaultPoint) -> GraphResult<()> {
        let armed = self
            .counter(point)
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if armed {
            tracing::debug!(%point, "injecting graph failure");
            Err(GraphError::Injected(point.name()))
        } else {
            Ok(())
        }
    }
}
