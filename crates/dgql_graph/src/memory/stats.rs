//! Transaction lifecycle counters.

use std::sync::atomic::{AtomicU64, Ordering};

/// Snapshot of a graph's transaction lifecycle counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GraphStats {
    /// Transactions started.
    pub begun: u64,
    /// Commit attempts on active transactions.
    pub commits: u64,
    /// Discard attempts on active transactions.
    pub discards: u64,
    /// Commits that applied their writes.
    pub committed: u64,
    /// Transactions dropped while still active.
    pub abandoned: u64,
}

impl GraphStats {
    /// Returns the number of transactions that are still active.
    #[must_use]
    pub fn open(&self) -> u64 {
        self.begun
            .saturating_sub(self.commits + self.discards + self.abandoned)
    }

    /// Returns the number of transactions that reached a terminal call.
    #[must_use]
    pub fn finished(&self) -> u64 {
        self.commits + self.discards
    }
}

#[derive(Debug, Default)]
pub(crate) struct StatsCounters {
    pub begun: AtomicU64,
    pub commits: AtomicU64,
    pub discards: AtomicU64,
    pub committed: AtomicU64,
    pub abandoned: AtomicU64,
}

impl StatsCounters {
    pub(crate) fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> GraphStats {
        GraphStats {
            begun: self.begun.load(Ordering::Relaxed),
            commits: self.commits.load(Ordering::Relaxed),
            discards: self.discards.load(Ordering::Relaxed),
            committed: self.committed.load(Ordering::Relaxed),
            abandoned: self.abandoned.load(Ordering::Relaxed),
        }
    }
}
